//! Storage abstraction for generated reports.
//!
//! The [`ReportStore`] trait is a whole-blob key-value store: the full report
//! list is read or written in one operation under a single fixed key. There
//! are no partial updates and no queries.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Report;

/// Key the report list is stored under unless configured otherwise.
pub const DEFAULT_REPORTS_KEY: &str = "docCheckerReports";

/// Abstract report storage backend.
///
/// All operations are async (via `async-trait`) so native hosts can do file
/// or network I/O while in-memory implementations return immediately-ready
/// futures.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](ReportStore::load) | Read the persisted list, `None` if nothing was ever saved |
/// | [`save`](ReportStore::save) | Replace the persisted list |
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Read the persisted report list, newest first.
    async fn load(&self) -> Result<Option<Vec<Report>>>;

    /// Replace the persisted report list.
    async fn save(&self, reports: &[Report]) -> Result<()>;
}

/// Serialize a report list the way every store persists it.
pub fn encode_reports(reports: &[Report]) -> Result<String> {
    Ok(serde_json::to_string(reports)?)
}

/// Parse a persisted blob. Empty or whitespace-only blobs read as no list.
pub fn decode_reports(blob: &str) -> Result<Option<Vec<Report>>> {
    if blob.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(blob)?))
}
