//! File-backed report store.
//!
//! The report list lives in a single JSON file, `<dir>/<key>.json`. Saves
//! write a sibling temporary file and rename it over the target, so a crash
//! mid-write leaves the previous list intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use doc_checker_core::models::Report;
use doc_checker_core::store::{decode_reports, encode_reports, ReportStore};

use crate::config::StorageConfig;

pub struct FileReportStore {
    path: PathBuf,
}

impl FileReportStore {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.dir, &config.key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn load(&self) -> Result<Option<Vec<Report>>> {
        let blob = match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => blob,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read reports: {}", self.path.display()))
            }
        };
        decode_reports(&blob)
            .with_context(|| format!("Failed to parse reports: {}", self.path.display()))
    }

    async fn save(&self, reports: &[Report]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let blob = encode_reports(reports)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), reports = reports.len(), "reports saved");
        Ok(())
    }
}
