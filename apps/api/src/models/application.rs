use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tracked application, as persisted in the ledger document.
///
/// `date_applied` is set once at creation and never touched again;
/// `last_updated` is stamped on every mutation. `details` accumulates keys
/// across updates (merge, not replace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub job_id: String,
    pub company: String,
    pub position: String,
    pub status: String,
    pub date_applied: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// Row shape served by `GET /api/automation/applications` — the date is
/// truncated to calendar-day precision for display.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: String,
    pub date: String,
}

impl From<&ApplicationRecord> for ApplicationView {
    fn from(record: &ApplicationRecord) -> Self {
        ApplicationView {
            id: record.job_id.clone(),
            company: record.company.clone(),
            position: record.position.clone(),
            status: record.status.clone(),
            date: record.date_applied.format("%Y-%m-%d").to_string(),
        }
    }
}
