//! SMTP backend for the `Mailer` seam — authenticated implicit-TLS relay,
//! multipart messages with file attachments.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer, OutgoingMail};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds a relay transport against `host` (SMTPS, port 465) with the
    /// given credentials.
    pub fn new(host: &str, username: &str, password: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(SmtpMailer { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|e| MailError::Build(format!("invalid sender {}: {e}", mail.from)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::Build(format!("invalid recipient {}: {e}", mail.to)))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
        for path in &mail.attachments {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| MailError::Attachment {
                    path: path.clone(),
                    source,
                })?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            multipart =
                multipart.singlepart(Attachment::new(filename).body(bytes, content_type_for(path)));
        }

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(&mail.subject)
            .multipart(multipart)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn content_type_for(path: &std::path::Path) -> ContentType {
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    // The parse only sees the fixed strings above.
    ContentType::parse(mime).unwrap_or(ContentType::TEXT_PLAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_pdf() {
        let ct = content_type_for(std::path::Path::new("cv_Alex_TechCorp.pdf"));
        assert_eq!(ct, ContentType::parse("application/pdf").unwrap());
    }

    #[test]
    fn test_content_type_defaults_to_octet_stream() {
        let ct = content_type_for(std::path::Path::new("archive.zip"));
        assert_eq!(ct, ContentType::parse("application/octet-stream").unwrap());
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_recipient_before_any_io() {
        let mailer = SmtpMailer::new("smtp.example.com", "user", "pass").unwrap();
        let mail = OutgoingMail {
            from: "sender@example.com".to_string(),
            to: "not an address".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
            attachments: vec![],
        };
        let err = mailer.send(&mail).await.unwrap_err();
        assert!(matches!(err, MailError::Build(_)));
    }
}
