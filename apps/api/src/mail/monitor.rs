//! Inbox monitor — the pull-based trigger path. Polls an IMAPS mailbox for
//! job-posting notifications and returns them shaped like webhook payloads.
//!
//! The imap session is blocking, so the whole fetch runs inside
//! `tokio::task::spawn_blocking`.

use mailparse::{MailHeaderMap, ParsedMail};
use serde::Serialize;
use tracing::warn;

use super::MailError;

/// Senders whose messages are considered job notifications.
const SENDER_FILTER: &str = "linkedin.com";

/// A message passes the filter when its subject contains any of these.
const SUBJECT_KEYWORDS: &[&str] = &["job offer", "position", "recruit"];

/// One inbound notification, shaped like the webhook payload.
#[derive(Debug, Clone, Serialize)]
pub struct JobNotification {
    pub subject: String,
    pub body: String,
    pub sender: String,
}

/// Fetches matching messages from the inbox. One authenticated session per
/// call; errors surface as `MailError::Poll`.
pub async fn fetch_job_notifications(
    host: String,
    email: String,
    password: String,
) -> Result<Vec<JobNotification>, MailError> {
    tokio::task::spawn_blocking(move || fetch_blocking(&host, &email, &password))
        .await
        .map_err(|e| MailError::Poll(e.to_string()))?
}

fn fetch_blocking(host: &str, email: &str, password: &str) -> Result<Vec<JobNotification>, MailError> {
    let tls = native_tls::TlsConnector::builder()
        .build()
        .map_err(|e| MailError::Poll(e.to_string()))?;
    let client =
        imap::connect((host, 993), host, &tls).map_err(|e| MailError::Poll(e.to_string()))?;
    let mut session = client
        .login(email, password)
        .map_err(|(e, _)| MailError::Poll(e.to_string()))?;

    session
        .select("INBOX")
        .map_err(|e| MailError::Poll(e.to_string()))?;

    let mut ids: Vec<u32> = session
        .search(format!("FROM \"{SENDER_FILTER}\""))
        .map_err(|e| MailError::Poll(e.to_string()))?
        .into_iter()
        .collect();
    ids.sort_unstable();

    let mut notifications = Vec::new();
    for id in ids {
        let messages = session
            .fetch(id.to_string(), "RFC822")
            .map_err(|e| MailError::Poll(e.to_string()))?;
        for message in messages.iter() {
            let Some(raw) = message.body() else { continue };
            match parse_notification(raw) {
                Ok(Some(notification)) => notifications.push(notification),
                Ok(None) => {}
                Err(e) => warn!("Skipping undecodable message {id}: {e}"),
            }
        }
    }

    session.logout().ok();
    Ok(notifications)
}

/// Decodes one raw RFC822 message; `None` when the subject filter rejects it.
fn parse_notification(raw: &[u8]) -> Result<Option<JobNotification>, MailError> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| MailError::Poll(e.to_string()))?;
    let headers = parsed.get_headers();
    let subject = headers.get_first_value("Subject").unwrap_or_default();
    let sender = headers.get_first_value("From").unwrap_or_default();

    if !subject_matches(&subject) {
        return Ok(None);
    }

    let body = plain_text_body(&parsed).unwrap_or_default();
    Ok(Some(JobNotification {
        subject,
        body,
        sender,
    }))
}

fn subject_matches(subject: &str) -> bool {
    let lowered = subject.to_lowercase();
    SUBJECT_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// A single-part message is its own body; a multipart message yields its
/// first non-attachment text/plain part.
fn plain_text_body(mail: &ParsedMail) -> Option<String> {
    if mail.subparts.is_empty() {
        return mail.get_body().ok();
    }
    find_plain_part(mail)
}

fn find_plain_part(mail: &ParsedMail) -> Option<String> {
    for part in &mail.subparts {
        if part.ctype.mimetype == "text/plain"
            && part.get_content_disposition().disposition
                != mailparse::DispositionType::Attachment
        {
            return part.get_body().ok();
        }
        if !part.subparts.is_empty() {
            if let Some(body) = find_plain_part(part) {
                return Some(body);
            }
        }
    }
    None
}
