//! Automation control surface: the process-wide switch and the application
//! listing.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::application::ApplicationView;
use crate::state::AppState;

/// GET /api/automation/status
pub async fn handle_status(State(state): State<AppState>) -> Json<Value> {
    let (status, message) = if state.automation.is_running() {
        ("active", "Automation system operational")
    } else {
        ("stopped", "Automation is paused")
    };
    Json(json!({ "status": status, "message": message }))
}

/// POST /api/automation/start
pub async fn handle_start(State(state): State<AppState>) -> Json<Value> {
    state.automation.start();
    Json(json!({
        "status": "started",
        "message": "Automation started successfully"
    }))
}

/// POST /api/automation/stop
pub async fn handle_stop(State(state): State<AppState>) -> Json<Value> {
    state.automation.stop();
    Json(json!({
        "status": "stopped",
        "message": "Automation stopped successfully"
    }))
}

/// GET /api/automation/applications
pub async fn handle_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let records = state.ledger.list_all().await?;
    Ok(Json(records.iter().map(ApplicationView::from).collect()))
}
