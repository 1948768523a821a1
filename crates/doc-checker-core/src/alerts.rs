//! Pathway alerts: changes detected in monitored policy sources.
//!
//! The dashboard shows this feed next to the analysis results. The entries
//! are static sample data; no live monitoring is performed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The change introduced a new contradiction.
    Alert,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayAlert {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub change: String,
    pub impact: String,
    pub status: AlertStatus,
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

pub fn sample_alerts() -> Vec<PathwayAlert> {
    vec![
        PathwayAlert {
            id: 1,
            timestamp: at("2025-09-19T10:15:00Z"),
            source: "College Policy Page".to_string(),
            change: "Attendance policy updated from 75% to 70%".to_string(),
            impact: "New contradiction detected with existing documents".to_string(),
            status: AlertStatus::Alert,
        },
        PathwayAlert {
            id: 2,
            timestamp: at("2025-09-19T09:30:00Z"),
            source: "HR Portal".to_string(),
            change: "Leave policy document modified".to_string(),
            impact: "No contradictions detected".to_string(),
            status: AlertStatus::Ok,
        },
    ]
}
