//! Lifecycle events and the observer interface.
//!
//! The controller never renders anything. It emits [`LifecycleEvent`]s to
//! every subscribed [`LifecycleObserver`], and a presentation layer (a web
//! page, a terminal, a test) decides what to show.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::lifecycle::LifecycleState;
use crate::models::{SeveritySummary, UsageCounters};
use crate::phase::{AnalysisPhase, PhaseStatus};

/// A single state change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
    },
    FilesAdded {
        count: usize,
    },
    FilesRemoved {
        count: usize,
    },
    AnalysisProgress {
        phase: AnalysisPhase,
        status: PhaseStatus,
        percent: u8,
    },
    AnalysisComplete {
        summary: SeveritySummary,
    },
    ReportGenerated {
        id: u64,
        title: String,
    },
    /// Previously persisted reports were restored at start-up.
    DashboardLoaded {
        reports: usize,
    },
    UsageUpdated {
        usage: UsageCounters,
    },
    /// A recoverable problem the user should hear about.
    Warning {
        title: String,
        message: String,
    },
    /// An operation failed.
    Error {
        title: String,
        message: String,
    },
}

/// Receives lifecycle events. Called synchronously, in emission order.
pub trait LifecycleObserver: Send + Sync {
    fn on_event(&self, event: &LifecycleEvent);
}

/// Observer that ignores everything.
pub struct NoObserver;

impl LifecycleObserver for NoObserver {
    fn on_event(&self, _event: &LifecycleEvent) {}
}

/// Observer that keeps every event it sees.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.lock().clone()
    }

    /// Drain and return the recorded events.
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.lock())
    }

    // Events are only ever pushed whole, so a poisoned log is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<LifecycleEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LifecycleObserver for EventLog {
    fn on_event(&self, event: &LifecycleEvent) {
        self.lock().push(event.clone());
    }
}
