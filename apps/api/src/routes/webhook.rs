//! Zapier-facing webhook surface — the push-based trigger for the pipeline.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::analysis::JobCategory;
use crate::state::AppState;

/// Inbound notification payload. Every field defaults to empty so partial
/// payloads reach the (total) heuristics instead of failing validation.
#[derive(Debug, Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub sender: String,
}

/// POST /api/zapier/webhook/linkedin-email
///
/// The pipeline's terminal outcome is mirrored into the response; any error
/// that escapes the pipeline is converted into a 500 here and never crashes
/// the caller.
pub async fn handle_linkedin_email(
    State(state): State<AppState>,
    payload: Option<Json<NotificationPayload>>,
) -> (StatusCode, Json<Value>) {
    let Some(Json(payload)) = payload else {
        warn!("LinkedIn webhook received without a payload");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "No payload received" })),
        );
    };

    info!(
        "LinkedIn e-mail received from {}: {}",
        payload.sender, payload.subject
    );

    match state
        .pipeline
        .process_notification(&payload.subject, &payload.body, &payload.sender)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": outcome.message,
                "job_type": outcome.job_type,
                "job_details": outcome.job_details,
                "github_project_url": outcome.github_project_url,
                "email_sent": outcome.email_sent,
            })),
        ),
        Err(e) => {
            error!("LinkedIn webhook processing failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": format!("Processing failed: {e}"),
                })),
            )
        }
    }
}

/// GET /api/zapier/webhook/test
pub async fn handle_test_get() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Test webhook operational",
        "method": "GET"
    }))
}

/// POST /api/zapier/webhook/test
pub async fn handle_test_post(payload: Option<Json<Value>>) -> Json<Value> {
    let data = payload.map(|Json(v)| v).unwrap_or_else(|| json!({}));
    info!("Test webhook received: {data}");
    Json(json!({
        "status": "success",
        "message": "Test webhook received",
        "method": "POST",
        "data_received": data
    }))
}

/// GET /api/zapier/config
pub async fn handle_config() -> Json<Value> {
    let specialists: Vec<Value> = JobCategory::all()
        .map(|category| {
            let specialist = category.specialist();
            json!({
                "category": category,
                "name": specialist.name,
                "endpoint": specialist.endpoint,
                "description": specialist.description,
            })
        })
        .collect();

    Json(json!({
        "webhooks": {
            "linkedin_email": "/api/zapier/webhook/linkedin-email",
            "test": "/api/zapier/webhook/test"
        },
        "specialists": specialists,
        "supported_methods": ["POST"],
        "content_type": "application/json"
    }))
}
