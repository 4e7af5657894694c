//! Mail collaborators — outbound SMTP replies and the pull-based inbox
//! monitor that substitutes for the webhook trigger.

pub mod monitor;
pub mod smtp;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("message build failed: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("attachment {path} unreadable: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mailbox poll failed: {0}")]
    Poll(String),
}

/// An outbound reply, possibly with file attachments.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

/// The mail-send collaborator. One attempt per call; no retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}
