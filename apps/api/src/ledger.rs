//! Application Ledger — the durable record of tracked applications.
//!
//! Persistence is whole-document read-modify-write over a single JSON file:
//! every call loads the entire store, mutates in memory and rewrites it. A
//! missing file is an empty ledger; an unparseable file is a fatal read error
//! and is never silently truncated. The read-modify-write section runs under
//! an async mutex held from load to store, so concurrent upserts within the
//! process cannot clobber each other. Cross-process writers remain
//! uncoordinated.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::application::ApplicationRecord;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ledger serialization failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// File-backed ledger. All access goes through `upsert` / `list_all`; no
/// other component touches the underlying document.
pub struct Ledger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Ledger {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Inserts a new record for `job_id` or merge-updates the existing one.
    ///
    /// On update: `status` is overwritten, `last_updated` restamped and
    /// `details` merged key-wise into the stored mapping (new values win on
    /// conflict, unmentioned keys survive). `date_applied` is never touched
    /// after creation.
    pub async fn upsert(
        &self,
        job_id: &str,
        company: &str,
        position: &str,
        status: &str,
        details: Option<Map<String, Value>>,
    ) -> Result<ApplicationRecord, LedgerError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let now = Utc::now();

        if let Some(existing) = records.iter_mut().find(|r| r.job_id == job_id) {
            existing.status = status.to_string();
            existing.last_updated = now;
            if let Some(details) = details {
                for (key, value) in details {
                    existing.details.insert(key, value);
                }
            }
            let updated = existing.clone();
            self.store(&records).await?;
            info!("Application {job_id} updated to status: {status}");
            return Ok(updated);
        }

        let record = ApplicationRecord {
            job_id: job_id.to_string(),
            company: company.to_string(),
            position: position.to_string(),
            status: status.to_string(),
            date_applied: now,
            last_updated: now,
            details: details.unwrap_or_default(),
        };
        records.push(record.clone());
        self.store(&records).await?;
        info!("New application recorded for {position} at {company} with status: {status}");
        Ok(record)
    }

    /// Returns the full ledger in insertion order.
    pub async fn list_all(&self) -> Result<Vec<ApplicationRecord>, LedgerError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn load(&self) -> Result<Vec<ApplicationRecord>, LedgerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    async fn store(&self, records: &[ApplicationRecord]) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(records).map_err(LedgerError::Encode)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| LedgerError::Io {
                path: self.path.clone(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("applications.json"));
        (dir, ledger)
    }

    fn details(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_store_is_an_empty_ledger() {
        let (_dir, ledger) = temp_ledger();
        assert!(ledger.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_store_is_a_fatal_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let ledger = Ledger::new(&path);
        let err = ledger.list_all().await.unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt { .. }));

        // The corrupt document must survive untouched — never truncated.
        let raw = tokio::fs::read(&path).await.unwrap();
        assert_eq!(raw, b"{ not json");
    }

    #[tokio::test]
    async fn test_upsert_twice_same_id_merges_into_one_record() {
        let (_dir, ledger) = temp_ledger();

        let first = ledger
            .upsert(
                "job_123",
                "TechCorp",
                "Full Stack Developer",
                "received/processing",
                Some(details(&[("cv_url", json!("http://cv.example/123"))])),
            )
            .await
            .unwrap();

        let second = ledger
            .upsert(
                "job_123",
                "TechCorp",
                "Full Stack Developer",
                "sent",
                Some(details(&[
                    ("interview_date", json!("2025-02-01")),
                    ("cv_url", json!("http://cv.example/456")),
                ])),
            )
            .await
            .unwrap();

        let all = ledger.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, "sent");
        // date_applied is immutable; last_updated moves forward.
        assert_eq!(all[0].date_applied, first.date_applied);
        assert!(second.last_updated >= first.last_updated);
        // Key-wise merge: second call's value wins, unmentioned keys survive.
        assert_eq!(all[0].details["cv_url"], json!("http://cv.example/456"));
        assert_eq!(all[0].details["interview_date"], json!("2025-02-01"));
    }

    #[tokio::test]
    async fn test_update_preserves_unmentioned_detail_keys() {
        let (_dir, ledger) = temp_ledger();
        ledger
            .upsert(
                "job_1",
                "Acme",
                "Engineer",
                "received/processing",
                Some(details(&[("github_url", json!("https://github.com/x/y"))])),
            )
            .await
            .unwrap();
        ledger
            .upsert("job_1", "Acme", "Engineer", "sent", None)
            .await
            .unwrap();

        let all = ledger.list_all().await.unwrap();
        assert_eq!(all[0].details["github_url"], json!("https://github.com/x/y"));
    }

    #[tokio::test]
    async fn test_distinct_ids_keep_insertion_order() {
        let (_dir, ledger) = temp_ledger();
        for (id, company) in [("a", "Acme"), ("b", "Beta"), ("c", "Cobalt")] {
            ledger
                .upsert(id, company, "Engineer", "received/processing", None)
                .await
                .unwrap();
        }

        let all = ledger.list_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_ledger_survives_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        {
            let ledger = Ledger::new(&path);
            ledger
                .upsert("job_9", "Acme", "Engineer", "sent", None)
                .await
                .unwrap();
        }

        let reopened = Ledger::new(&path);
        let all = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].job_id, "job_9");
    }
}
