use std::sync::Arc;

use crate::automation::{AutomationSwitch, Pipeline};
use crate::ledger::Ledger;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub ledger: Arc<Ledger>,
    pub automation: AutomationSwitch,
}
