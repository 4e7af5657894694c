#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::integrations::github::RepoError;
use crate::ledger::LedgerError;
use crate::mail::MailError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Ledger(e) => {
                tracing::error!("Ledger error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LEDGER_ERROR",
                    "A persistence error occurred".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Resume generation failed".to_string(),
                )
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_ERROR",
                    "A mail delivery error occurred".to_string(),
                )
            }
            AppError::Repo(e) => {
                tracing::error!("Repository error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPO_ERROR",
                    "Repository provisioning failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
