//! In-memory [`ReportStore`] implementation for testing and WASM targets.
//!
//! Holds serialized blobs in a `HashMap` behind `std::sync::RwLock`, the same
//! way a browser's local storage holds strings, so a save/load cycle goes
//! through the real encoding.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Report;

use super::{decode_reports, encode_reports, ReportStore, DEFAULT_REPORTS_KEY};

/// In-memory report store.
pub struct InMemoryReportStore {
    key: String,
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_REPORTS_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw blob stored under this store's key.
    pub fn raw(&self) -> Option<String> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.key).cloned()
    }

    /// Overwrite the raw blob, bypassing encoding.
    pub fn set_raw(&self, blob: impl Into<String>) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.key.clone(), blob.into());
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn load(&self) -> Result<Option<Vec<Report>>> {
        match self.raw() {
            Some(blob) => decode_reports(&blob),
            None => Ok(None),
        }
    }

    async fn save(&self, reports: &[Report]) -> Result<()> {
        let blob = encode_reports(reports)?;
        self.set_raw(blob);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisResult, Contradiction, Severity};
    use chrono::{DateTime, Utc};

    fn report(id: u64) -> Report {
        let at: DateTime<Utc> = DateTime::from_timestamp(1_726_740_000 + id as i64, 0).unwrap();
        Report {
            id,
            title: Report::title_for(id),
            generated_at: at,
            analysis: AnalysisResult::new(
                vec![Contradiction {
                    id: Some(1),
                    kind: "Time Conflict".to_string(),
                    severity: Severity::High,
                    description: "d".to_string(),
                    details: "details".to_string(),
                    sources: vec!["a.pdf".to_string(), "b.txt".to_string()],
                    suggestion: "s".to_string(),
                    confidence: 0.9,
                }],
                vec!["a.pdf".to_string(), "b.txt".to_string()],
                at,
            ),
        }
    }

    #[tokio::test]
    async fn empty_store_loads_none() {
        let store = InMemoryReportStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(store.key(), "docCheckerReports");
    }

    #[tokio::test]
    async fn save_then_load_preserves_order() {
        let store = InMemoryReportStore::new();
        let reports = vec![report(2), report(1)];
        store.save(&reports).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(reports));
    }

    #[tokio::test]
    async fn corrupt_blob_is_an_error() {
        let store = InMemoryReportStore::new();
        store.set_raw("{not json");
        assert!(store.load().await.is_err());
    }
}
