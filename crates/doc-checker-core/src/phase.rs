//! The three analysis sub-phases and their progress checkpoints.
//!
//! Phases run strictly in order (parse, detect, report-prep). The tracker
//! only exposes [`begin`](PhaseTracker::begin) and
//! [`finish`](PhaseTracker::finish), so a phase can never activate before
//! its predecessor completed. Completion is signalled when the work is done;
//! start and end times come from the caller's clock.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Parse,
    Detect,
    ReportPrep,
}

impl AnalysisPhase {
    pub const ALL: [AnalysisPhase; 3] = [
        AnalysisPhase::Parse,
        AnalysisPhase::Detect,
        AnalysisPhase::ReportPrep,
    ];

    /// Progress reported once this phase completes.
    pub fn checkpoint_percent(&self) -> u8 {
        match self {
            AnalysisPhase::Parse => 33,
            AnalysisPhase::Detect => 66,
            AnalysisPhase::ReportPrep => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisPhase::Parse => "Parsing documents",
            AnalysisPhase::Detect => "Detecting contradictions",
            AnalysisPhase::ReportPrep => "Preparing report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRecord {
    pub phase: AnalysisPhase,
    pub status: PhaseStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PhaseRecord {
    fn pending(phase: AnalysisPhase) -> Self {
        Self {
            phase,
            status: PhaseStatus::Pending,
            started_at: None,
            completed_at: None,
        }
    }

    /// Time spent in the phase, once it completed.
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.completed_at? - self.started_at?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTracker {
    records: Vec<PhaseRecord>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            records: AnalysisPhase::ALL
                .iter()
                .map(|p| PhaseRecord::pending(*p))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn records(&self) -> &[PhaseRecord] {
        &self.records
    }

    pub fn status(&self, phase: AnalysisPhase) -> PhaseStatus {
        self.records
            .iter()
            .find(|r| r.phase == phase)
            .map(|r| r.status)
            .unwrap_or(PhaseStatus::Pending)
    }

    pub fn active(&self) -> Option<AnalysisPhase> {
        self.records
            .iter()
            .find(|r| r.status == PhaseStatus::Active)
            .map(|r| r.phase)
    }

    /// Checkpoint of the last completed phase, `0` before any completes.
    pub fn progress_percent(&self) -> u8 {
        self.records
            .iter()
            .rev()
            .find(|r| r.status == PhaseStatus::Completed)
            .map(|r| r.phase.checkpoint_percent())
            .unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.records.iter().all(|r| r.status == PhaseStatus::Completed)
    }

    /// Activate the next pending phase. Returns `None` while a phase is
    /// still active or when every phase already completed.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Option<AnalysisPhase> {
        if self.active().is_some() {
            return None;
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.status == PhaseStatus::Pending)?;
        record.status = PhaseStatus::Active;
        record.started_at = Some(now);
        Some(record.phase)
    }

    /// Complete the active phase, returning it with its checkpoint.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<(AnalysisPhase, u8)> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.status == PhaseStatus::Active)?;
        record.status = PhaseStatus::Completed;
        record.completed_at = Some(now);
        Some((record.phase, record.phase.checkpoint_percent()))
    }
}
