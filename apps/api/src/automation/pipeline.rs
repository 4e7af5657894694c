//! Application pipeline — orchestrates the full response to one inbound
//! job notification.
//!
//! Flow: classify + extract → register in ledger → render resume PDF →
//!       provision GitHub repository → send reply mail → final ledger update.
//!
//! Failure handling is deliberately uneven: resume rendering aborts the
//! pipeline, repository provisioning is the single soft-fail step (the URL is
//! simply absent from the outcome), and the reply-mail result decides the
//! final ledger status. The webhook handler catches anything that escapes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::analysis::{classify, extract, JobCategory, JobPosting};
use crate::errors::AppError;
use crate::integrations::github::{RepoProvisioner, RepoRequest};
use crate::integrations::zapier::ZapierNotifier;
use crate::ledger::Ledger;
use crate::mail::{Mailer, OutgoingMail};
use crate::models::profile::Profile;
use crate::render::ResumeRenderer;

/// Status vocabulary used by the pipeline. Other components may write other
/// statuses; nothing enforces a state machine beyond these conventions.
const STATUS_PROCESSING: &str = "received/processing";
const STATUS_SENT: &str = "sent";
const STATUS_FAILED: &str = "failed-to-send";

/// Aggregated result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub job_type: JobCategory,
    pub job_details: JobPosting,
    pub github_project_url: Option<String>,
    pub email_sent: bool,
    pub message: String,
}

pub struct Pipeline {
    profile: Profile,
    ledger: Arc<Ledger>,
    renderer: Arc<dyn ResumeRenderer>,
    repos: Arc<dyn RepoProvisioner>,
    mailer: Arc<dyn Mailer>,
    zapier: Option<Arc<ZapierNotifier>>,
    reply_from: String,
}

impl Pipeline {
    pub fn new(
        profile: Profile,
        ledger: Arc<Ledger>,
        renderer: Arc<dyn ResumeRenderer>,
        repos: Arc<dyn RepoProvisioner>,
        mailer: Arc<dyn Mailer>,
        zapier: Option<Arc<ZapierNotifier>>,
        reply_from: String,
    ) -> Self {
        Pipeline {
            profile,
            ledger,
            renderer,
            repos,
            mailer,
            zapier,
            reply_from,
        }
    }

    /// Runs the full pipeline for one notification.
    pub async fn process_notification(
        &self,
        subject: &str,
        body: &str,
        sender: &str,
    ) -> Result<PipelineOutcome, AppError> {
        // Step 1: classify and extract. Both pure and order-insensitive.
        let job_type = classify(subject, body);
        let posting = extract(subject, body);
        info!(
            "Posting analyzed: type={}, title={:?}, company={:?}",
            job_type.as_str(),
            posting.title,
            posting.company
        );

        // Step 2: register the application.
        let job_id = derive_job_id(subject, Utc::now());
        self.ledger
            .upsert(
                &job_id,
                &posting.company,
                &posting.title,
                STATUS_PROCESSING,
                Some(posting_details(&posting)),
            )
            .await?;

        // Step 3: render the tailored resume. The scratch directory is
        // dropped when this function returns, releasing the PDF regardless
        // of how the remaining steps fare.
        let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
        let cv_filename = format!(
            "cv_{}_{}.pdf",
            self.profile.name.replace(' ', "_"),
            posting.company.replace(' ', "_")
        );
        let cv_path = scratch.path().join(&cv_filename);
        self.renderer
            .render(&self.profile, &posting, &cv_path)
            .await?;
        info!("Resume PDF generated: {cv_filename}");

        // Step 4: provision the demonstration repository. The only
        // soft-fail step.
        let repo_request = RepoRequest {
            name: format!(
                "Project_{}_{}",
                posting.title.replace(' ', "_"),
                posting.company.replace(' ', "_")
            ),
            description: format!(
                "Demonstration project for the {} position at {}.",
                posting.title, posting.company
            ),
            private: false,
        };
        let github_project_url = match self.repos.create(&repo_request).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Repository provisioning failed, continuing without it: {e}");
                None
            }
        };

        // Step 5: send the reply with the resume attached; the result decides
        // the final ledger status.
        let reply = OutgoingMail {
            from: self.reply_from.clone(),
            to: sender.to_string(),
            subject: format!(
                "Application for the {} position at {}",
                posting.title, posting.company
            ),
            body: reply_body(&self.profile, &posting, github_project_url.as_deref()),
            attachments: vec![cv_path.clone()],
        };
        let email_sent = match self.mailer.send(&reply).await {
            Ok(()) => {
                info!("Automated reply sent to {sender}");
                true
            }
            Err(e) => {
                error!("Failed to send automated reply to {sender}: {e}");
                false
            }
        };

        let final_status = if email_sent { STATUS_SENT } else { STATUS_FAILED };
        let mut final_details = Map::new();
        final_details.insert("github_url".to_string(), json!(github_project_url));
        final_details.insert("cv_file".to_string(), json!(cv_filename));
        self.ledger
            .upsert(
                &job_id,
                &posting.company,
                &posting.title,
                final_status,
                Some(final_details),
            )
            .await?;

        if let Some(zapier) = &self.zapier {
            let event = json!({
                "event": "job_application_processed",
                "job_id": job_id,
                "job_type": job_type,
                "title": posting.title,
                "company": posting.company,
                "email_sent": email_sent,
            });
            zapier.forward(&event).await;
        }

        Ok(PipelineOutcome {
            job_type,
            job_details: posting,
            github_project_url,
            email_sent,
            message: "Automated application pipeline completed.".to_string(),
        })
    }
}

/// Derives the per-invocation job identifier: a second-precision timestamp
/// plus the subject's hash truncated to four digits. Two identical subjects
/// in the same second collide only through the hash — a known, accepted
/// limitation of the scheme.
fn derive_job_id(subject: &str, now: DateTime<Utc>) -> String {
    let mut hasher = DefaultHasher::new();
    subject.hash(&mut hasher);
    format!(
        "app_{}_{}",
        now.format("%Y%m%d%H%M%S"),
        hasher.finish() % 10_000
    )
}

/// The posting, flattened into the ledger's `details` mapping.
fn posting_details(posting: &JobPosting) -> Map<String, Value> {
    match serde_json::to_value(posting) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn reply_body(profile: &Profile, posting: &JobPosting, github_url: Option<&str>) -> String {
    let mut body = format!(
        "Hello,\n\nThank you for the opportunity to apply for the {} position at {}.\n\n\
         Please find attached my resume tailored for this role.",
        posting.title, posting.company
    );
    if let Some(url) = github_url {
        body.push_str(&format!(
            " You can also review a relevant project on GitHub: {url}"
        ));
    }
    body.push_str(&format!(
        "\n\nI would be glad to discuss this opportunity further.\n\nBest regards,\n{}",
        profile.name
    ));
    body
}

// ────────────────────────────────────────────────────────────────────────────
// Tests and shared mock collaborators
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::analysis::JobPosting;
    use crate::integrations::github::{RepoError, RepoProvisioner, RepoRequest};
    use crate::ledger::Ledger;
    use crate::mail::{MailError, Mailer, OutgoingMail};
    use crate::models::profile::Profile;
    use crate::render::{RenderError, ResumeRenderer};

    use super::Pipeline;

    #[derive(Default)]
    pub struct MockRenderer {
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl ResumeRenderer for MockRenderer {
        async fn render(
            &self,
            _profile: &Profile,
            _posting: &JobPosting,
            output: &Path,
        ) -> Result<(), RenderError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RenderError::Pdf("simulated failure".to_string()));
            }
            std::fs::write(output, b"%PDF-1.5 mock")?;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockRepos {
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl RepoProvisioner for MockRepos {
        async fn create(&self, request: &RepoRequest) -> Result<String, RepoError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RepoError::Api {
                    status: 422,
                    body: "simulated failure".to_string(),
                });
            }
            Ok(format!("https://github.com/mock/{}", request.name))
        }
    }

    #[derive(Default)]
    pub struct MockMailer {
        pub fail: AtomicBool,
        pub sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(MailError::Transport("simulated failure".to_string()));
            }
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }

    pub struct TestHarness {
        pub pipeline: Pipeline,
        pub ledger: Arc<Ledger>,
        pub renderer: Arc<MockRenderer>,
        pub repos: Arc<MockRepos>,
        pub mailer: Arc<MockMailer>,
        pub _dir: tempfile::TempDir,
    }

    pub fn harness() -> TestHarness {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(Ledger::new(dir.path().join("applications.json")));
        let renderer = Arc::new(MockRenderer::default());
        let repos = Arc::new(MockRepos::default());
        let mailer = Arc::new(MockMailer::default());
        let pipeline = Pipeline::new(
            Profile::default(),
            ledger.clone(),
            renderer.clone(),
            repos.clone(),
            mailer.clone(),
            None,
            "automation@example.com".to_string(),
        );
        TestHarness {
            pipeline,
            ledger,
            renderer,
            repos,
            mailer,
            _dir: dir,
        }
    }
}
