pub mod automation;
pub mod health;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Automation control surface
        .route("/api/automation/status", get(automation::handle_status))
        .route("/api/automation/start", post(automation::handle_start))
        .route("/api/automation/stop", post(automation::handle_stop))
        .route(
            "/api/automation/applications",
            get(automation::handle_applications),
        )
        // Zapier-facing webhooks
        .route(
            "/api/zapier/webhook/linkedin-email",
            post(webhook::handle_linkedin_email),
        )
        .route(
            "/api/zapier/webhook/test",
            get(webhook::handle_test_get).post(webhook::handle_test_post),
        )
        .route("/api/zapier/config", get(webhook::handle_config))
        .with_state(state)
}
