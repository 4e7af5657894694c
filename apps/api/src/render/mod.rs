//! Resume rendering — produces the tailored PDF attached to the reply mail.
//!
//! `ResumeRenderer` is the seam the pipeline depends on; `PdfResumeRenderer`
//! is the production backend. PDF composition is CPU-bound and runs inside
//! `tokio::task::spawn_blocking`.

pub mod pdf;
pub mod templates;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::JobPosting;
use crate::models::profile::Profile;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF composition failed: {0}")]
    Pdf(String),

    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task aborted: {0}")]
    Join(String),
}

/// The resume generation collaborator. Implement this to swap document
/// backends without touching the pipeline.
#[async_trait]
pub trait ResumeRenderer: Send + Sync {
    /// Renders a resume for `profile`, tailored to `posting`, at `output`.
    async fn render(
        &self,
        profile: &Profile,
        posting: &JobPosting,
        output: &Path,
    ) -> Result<(), RenderError>;
}

/// Default backend: a paginated PDF composed with lopdf.
pub struct PdfResumeRenderer;

#[async_trait]
impl ResumeRenderer for PdfResumeRenderer {
    async fn render(
        &self,
        profile: &Profile,
        posting: &JobPosting,
        output: &Path,
    ) -> Result<(), RenderError> {
        let profile = profile.clone();
        let posting = posting.clone();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || pdf::compose_resume(&profile, &posting, &output))
            .await
            .map_err(|e| RenderError::Join(e.to_string()))?
    }
}
