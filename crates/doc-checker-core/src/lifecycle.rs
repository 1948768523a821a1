//! The analysis lifecycle controller.
//!
//! [`AnalysisController`] owns the upload batch, the current analysis
//! result, the report list, and the usage counters. Every mutating method
//! takes `&mut self`, so one operation runs to completion (or to its next
//! await) before another can start; no locking is needed.
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | Empty batch, no result |
//! | `Collecting` | Documents uploaded, no result yet |
//! | `Analyzing` | Parse, detect, report-prep in progress |
//! | `Results` | A current result is available for reports |
//!
//! # Billing
//!
//! A successful analysis charges `batch_size × document_analysis`; each
//! report charges `report_generation`. Counters never decrease.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use doc_checker_core::models::DocumentCandidate;
//! use doc_checker_core::source::MockSource;
//! use doc_checker_core::store::memory::InMemoryReportStore;
//! use doc_checker_core::{AnalysisController, ControllerConfig, LifecycleState};
//!
//! # tokio_test_block_on(async {
//! let mut controller = AnalysisController::new(
//!     ControllerConfig::default(),
//!     Arc::new(MockSource::fixed(2)),
//!     Arc::new(InMemoryReportStore::new()),
//! );
//! controller.initialize().await;
//! controller
//!     .add_documents(vec![
//!         DocumentCandidate::metadata_only("a.pdf", 1_000_000),
//!         DocumentCandidate::metadata_only("b.docx", 2_000_000),
//!     ])
//!     .unwrap();
//! let result = controller.start_analysis().await.unwrap();
//! assert_eq!(result.summary.total, 2);
//! assert_eq!(controller.state(), LifecycleState::Results);
//! assert_eq!(controller.usage().credits_used.to_string(), "$1.00");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::batch::{AddOutcome, Batch, BatchLimits};
use crate::clock::{Clock, SystemClock};
use crate::error::LifecycleError;
use crate::models::{AnalysisResult, DocumentCandidate, Pricing, Report, UsageCounters};
use crate::observer::{LifecycleEvent, LifecycleObserver};
use crate::phase::{PhaseStatus, PhaseTracker};
use crate::source::AnalysisSource;
use crate::store::ReportStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Idle,
    Collecting,
    Analyzing,
    Results,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    pub limits: BatchLimits,
    pub pricing: Pricing,
}

/// Derived state for the clear/analyze controls of a front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlsState {
    pub can_clear: bool,
    pub can_analyze: bool,
    pub analyze_label: String,
}

pub struct AnalysisController {
    config: ControllerConfig,
    state: LifecycleState,
    batch: Batch,
    current: Option<AnalysisResult>,
    reports: Vec<Report>,
    usage: UsageCounters,
    phases: PhaseTracker,
    last_error: Option<String>,
    /// Set when the persisted list could not be read. Saving would replace
    /// it, so reports stay in memory until a later load succeeds.
    store_unreadable: bool,
    source: Arc<dyn AnalysisSource>,
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl AnalysisController {
    pub fn new(
        config: ControllerConfig,
        source: Arc<dyn AnalysisSource>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            config,
            state: LifecycleState::Idle,
            batch: Batch::new(config.limits),
            current: None,
            reports: Vec::new(),
            usage: UsageCounters::default(),
            phases: PhaseTracker::new(),
            last_error: None,
            store_unreadable: false,
            source,
            store,
            clock: Arc::new(SystemClock),
            observers: Vec::new(),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn subscribe(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }

    // ── Read-only projections ──────────────────────────────────────────

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn current_result(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    /// Reports, newest first.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn find_report(&self, id: u64) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn usage(&self) -> &UsageCounters {
        &self.usage
    }

    pub fn phases(&self) -> &PhaseTracker {
        &self.phases
    }

    /// Description of the most recent failed analysis, cleared by the next
    /// attempt or a reset.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn can_analyze(&self) -> bool {
        self.batch.can_analyze()
    }

    pub fn controls(&self) -> ControlsState {
        let can_analyze = self.can_analyze();
        ControlsState {
            can_clear: !self.batch.is_empty(),
            can_analyze,
            analyze_label: if can_analyze {
                format!("Analyze {} Documents", self.batch.len())
            } else {
                format!(
                    "Analyze Documents (Need {}+)",
                    self.config.limits.min_documents
                )
            },
        }
    }

    // ── Start-up ───────────────────────────────────────────────────────

    /// Restore persisted reports. Returns how many were loaded; a store
    /// failure is logged, reported as a warning, and leaves the list empty.
    /// Until a later load succeeds, generated reports are not saved over
    /// the unreadable list.
    pub async fn initialize(&mut self) -> usize {
        let loaded = self.store.load().await;
        self.store_unreadable = loaded.is_err();
        match loaded {
            Ok(Some(reports)) if !reports.is_empty() => {
                let n = reports.len();
                self.reports = reports;
                info!(reports = n, "restored persisted reports");
                self.emit(LifecycleEvent::DashboardLoaded { reports: n });
                n
            }
            Ok(_) => 0,
            Err(e) => {
                let err = LifecycleError::PersistenceFailure(format!("{:#}", e));
                warn!(error = %err, "could not load persisted reports");
                self.warn_about(&err);
                0
            }
        }
    }

    // ── Batch manager ──────────────────────────────────────────────────

    /// Offer files for the batch. See [`Batch::add`] for the rules.
    pub fn add_documents(
        &mut self,
        candidates: Vec<DocumentCandidate>,
    ) -> Result<AddOutcome, LifecycleError> {
        let outcome = match self.batch.add(candidates) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.warn_about(&err);
                return Err(err);
            }
        };
        for rejected in &outcome.rejected {
            self.warn_about(rejected);
        }
        if !outcome.added.is_empty() {
            debug!(added = outcome.added.len(), batch = self.batch.len(), "documents added");
            self.emit(LifecycleEvent::FilesAdded {
                count: outcome.added.len(),
            });
        }
        self.settle_batch_state();
        Ok(outcome)
    }

    /// Remove a document by name. Returns `false` if it was not in the batch.
    pub fn remove_document(&mut self, name: &str) -> bool {
        if self.batch.remove(name).is_none() {
            return false;
        }
        self.emit(LifecycleEvent::FilesRemoved { count: 1 });
        self.settle_batch_state();
        true
    }

    pub fn clear(&mut self) {
        let removed = self.batch.clear();
        if removed > 0 {
            self.emit(LifecycleEvent::FilesRemoved { count: removed });
        }
        self.settle_batch_state();
    }

    // ── Analysis ───────────────────────────────────────────────────────

    /// Run parse, detect, and report-prep over the current batch.
    ///
    /// Fails with [`LifecycleError::InsufficientDocuments`] (nothing
    /// changes) when the batch is too small, and with
    /// [`LifecycleError::AnalysisSourceFailure`] when the source errors or
    /// returns invalid records; in that case the batch and the previous
    /// state are restored and no charge is applied.
    pub async fn start_analysis(&mut self) -> Result<&AnalysisResult, LifecycleError> {
        if !self.batch.can_analyze() {
            let err = LifecycleError::InsufficientDocuments {
                count: self.batch.len(),
                min: self.config.limits.min_documents,
            };
            self.warn_about(&err);
            return Err(err);
        }

        let resume = self.state;
        self.last_error = None;
        self.phases.reset();
        self.transition(LifecycleState::Analyzing);

        self.begin_phase();
        debug!(
            documents = self.batch.len(),
            bytes = self.batch.total_bytes(),
            "parsed batch"
        );
        self.finish_phase();

        self.begin_phase();
        let source = Arc::clone(&self.source);
        let detected = source
            .analyze(self.batch.documents())
            .await
            .map_err(|e| format!("{:#}", e))
            .and_then(|found| {
                for c in &found {
                    c.validate()
                        .map_err(|reason| format!("malformed analysis result: {}", reason))?;
                }
                Ok(found)
            });
        let contradictions = match detected {
            Ok(found) => found,
            Err(message) => return Err(self.abort_analysis(resume, message)),
        };
        self.finish_phase();

        self.begin_phase();
        let result = AnalysisResult::new(contradictions, self.batch.names(), self.clock.now());
        self.finish_phase();

        let batch_size = self.batch.len() as u64;
        self.usage.record_analysis(batch_size, &self.config.pricing);
        let summary = result.summary;
        info!(
            source = source.name(),
            documents = batch_size,
            contradictions = summary.total,
            credits = %self.usage.credits_used,
            "analysis complete"
        );

        self.current = Some(result);
        self.transition(LifecycleState::Results);
        self.emit(LifecycleEvent::AnalysisComplete { summary });
        self.emit(LifecycleEvent::UsageUpdated { usage: self.usage });

        self.current
            .as_ref()
            .ok_or_else(|| LifecycleError::AnalysisSourceFailure("result was not recorded".into()))
    }

    fn abort_analysis(&mut self, resume: LifecycleState, message: String) -> LifecycleError {
        warn!(source = self.source.name(), error = %message, "analysis failed");
        self.phases.reset();
        self.last_error = Some(message.clone());
        let restored = match resume {
            LifecycleState::Results if self.current.is_some() => LifecycleState::Results,
            _ if self.batch.is_empty() => LifecycleState::Idle,
            _ => LifecycleState::Collecting,
        };
        self.transition(restored);
        let err = LifecycleError::AnalysisSourceFailure(message);
        self.emit(LifecycleEvent::Error {
            title: err.title().to_string(),
            message: err.to_string(),
        });
        err
    }

    fn begin_phase(&mut self) {
        if let Some(phase) = self.phases.begin(self.clock.now()) {
            debug!(phase = phase.label(), "phase started");
            self.emit(LifecycleEvent::AnalysisProgress {
                phase,
                status: PhaseStatus::Active,
                percent: self.phases.progress_percent(),
            });
        }
    }

    fn finish_phase(&mut self) {
        if let Some((phase, percent)) = self.phases.finish(self.clock.now()) {
            self.emit(LifecycleEvent::AnalysisProgress {
                phase,
                status: PhaseStatus::Completed,
                percent,
            });
        }
    }

    // ── Reports ────────────────────────────────────────────────────────

    /// Snapshot the current result as a new report and persist the list.
    ///
    /// Returns `None` (and charges nothing) without a current result. A
    /// persistence failure is logged and reported as a warning; the report
    /// and its charge stand. If the saved list could not be read at startup
    /// it is read again first and merged, and left untouched if it still
    /// cannot be read.
    pub async fn generate_report(&mut self) -> Option<&Report> {
        let analysis = self.current.clone()?;
        if self.store_unreadable {
            self.reclaim_saved_reports().await;
        }
        let sequence = self.usage.record_report(&self.config.pricing);
        let now = self.clock.now();
        let report = Report {
            id: self.next_report_id(now.timestamp_millis()),
            title: Report::title_for(sequence),
            generated_at: now,
            analysis,
        };
        info!(id = report.id, title = %report.title, "report generated");
        let event = LifecycleEvent::ReportGenerated {
            id: report.id,
            title: report.title.clone(),
        };
        self.reports.insert(0, report);
        self.persist_reports().await;

        self.emit(event);
        self.emit(LifecycleEvent::UsageUpdated { usage: self.usage });
        self.reports.first()
    }

    /// Retry a load that failed at startup, appending the saved reports
    /// behind this session's newer ones.
    async fn reclaim_saved_reports(&mut self) {
        if let Ok(persisted) = self.store.load().await {
            for old in persisted.unwrap_or_default() {
                if self.find_report(old.id).is_none() {
                    self.reports.push(old);
                }
            }
            self.store_unreadable = false;
        }
    }

    async fn persist_reports(&mut self) {
        if self.store_unreadable {
            let err = LifecycleError::PersistenceFailure(
                "saved reports could not be read, not overwriting them".to_string(),
            );
            warn!(error = %err, "skipping report save");
            self.warn_about(&err);
            return;
        }
        if let Err(e) = self.store.save(&self.reports).await {
            let err = LifecycleError::PersistenceFailure(format!("{:#}", e));
            warn!(error = %err, "could not persist reports");
            self.warn_about(&err);
        }
    }

    /// Milliseconds since the epoch, bumped past every id already held.
    /// When no larger id exists, the smallest unused id is taken.
    fn next_report_id(&self, now_millis: i64) -> u64 {
        let candidate = now_millis.max(0) as u64;
        let taken = |id: u64| self.reports.iter().any(|r| r.id == id);
        match self.reports.iter().map(|r| r.id).max() {
            Some(highest) if candidate <= highest => match highest.checked_add(1) {
                Some(next) => next,
                None => (0..=u64::MAX).find(|id| !taken(*id)).unwrap_or(candidate),
            },
            _ => candidate,
        }
    }

    // ── Reset ──────────────────────────────────────────────────────────

    /// Drop the batch and the current result and return to `Idle`.
    /// Reports and usage are kept.
    pub fn reset_for_new_analysis(&mut self) {
        let removed = self.batch.clear();
        if removed > 0 {
            self.emit(LifecycleEvent::FilesRemoved { count: removed });
        }
        self.current = None;
        self.phases.reset();
        self.last_error = None;
        self.transition(LifecycleState::Idle);
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn settle_batch_state(&mut self) {
        if matches!(self.state, LifecycleState::Idle | LifecycleState::Collecting) {
            let next = if self.batch.is_empty() {
                LifecycleState::Idle
            } else {
                LifecycleState::Collecting
            };
            self.transition(next);
        }
    }

    fn transition(&mut self, to: LifecycleState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(?from, ?to, "state changed");
        self.emit(LifecycleEvent::StateChanged { from, to });
    }

    fn warn_about(&self, err: &LifecycleError) {
        self.emit(LifecycleEvent::Warning {
            title: err.title().to_string(),
            message: err.to_string(),
        });
    }

    fn emit(&self, event: LifecycleEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
