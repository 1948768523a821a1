//! Terminal observers for lifecycle events.
//!
//! Events are written to **stderr** so stdout stays parseable for scripts
//! (`doc-checker analyze --json a.pdf b.docx | jq`).

use std::io::Write;
use std::sync::Arc;

use clap::ValueEnum;

use doc_checker_core::observer::{LifecycleEvent, LifecycleObserver, NoObserver};
use doc_checker_core::phase::PhaseStatus;

/// Human-friendly lines: "analysis  Detecting contradictions  done (66%)".
pub struct StderrObserver;

impl StderrObserver {
    fn line(event: &LifecycleEvent) -> Option<String> {
        let line = match event {
            LifecycleEvent::StateChanged { .. } => return None,
            LifecycleEvent::FilesAdded { count } => format!("batch  +{} file(s)", count),
            LifecycleEvent::FilesRemoved { count } => format!("batch  -{} file(s)", count),
            LifecycleEvent::AnalysisProgress {
                phase,
                status,
                percent,
            } => match status {
                PhaseStatus::Active => format!("analysis  {}...", phase.label()),
                PhaseStatus::Completed => {
                    format!("analysis  {}  done ({}%)", phase.label(), percent)
                }
                PhaseStatus::Pending => return None,
            },
            LifecycleEvent::AnalysisComplete { summary } => format!(
                "analysis  complete: {} contradiction(s) ({} high, {} medium, {} low)",
                summary.total, summary.high, summary.medium, summary.low
            ),
            LifecycleEvent::ReportGenerated { id, title } => {
                format!("report  {} saved as {}", title, id)
            }
            LifecycleEvent::DashboardLoaded { reports } => {
                format!("reports  {} previous report(s) loaded", reports)
            }
            LifecycleEvent::UsageUpdated { usage } => format!(
                "usage  {} document(s), {} report(s), {} credits",
                usage.documents_analyzed, usage.reports_generated, usage.credits_used
            ),
            LifecycleEvent::Warning { title, message } => {
                format!("warning  {}: {}", title, message)
            }
            LifecycleEvent::Error { title, message } => format!("error  {}: {}", title, message),
        };
        Some(line)
    }
}

impl LifecycleObserver for StderrObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        if let Some(line) = Self::line(event) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }
}

/// Machine-readable events: one JSON object per line on stderr.
pub struct JsonObserver;

impl LifecycleObserver for JsonObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }
}

/// Observer mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ObserverMode {
    Off,
    Human,
    Json,
}

impl ObserverMode {
    /// Default: human output when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ObserverMode::Human
        } else {
            ObserverMode::Off
        }
    }

    pub fn observer(&self) -> Arc<dyn LifecycleObserver> {
        match self {
            ObserverMode::Off => Arc::new(NoObserver),
            ObserverMode::Human => Arc::new(StderrObserver),
            ObserverMode::Json => Arc::new(JsonObserver),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_checker_core::models::{Credits, UsageCounters};
    use doc_checker_core::phase::AnalysisPhase;
    use doc_checker_core::LifecycleState;

    #[test]
    fn human_lines() {
        assert_eq!(
            StderrObserver::line(&LifecycleEvent::AnalysisProgress {
                phase: AnalysisPhase::Detect,
                status: PhaseStatus::Completed,
                percent: 66,
            })
            .unwrap(),
            format!("analysis  {}  done (66%)", AnalysisPhase::Detect.label())
        );
        assert_eq!(
            StderrObserver::line(&LifecycleEvent::UsageUpdated {
                usage: UsageCounters {
                    documents_analyzed: 2,
                    reports_generated: 1,
                    credits_used: Credits::from_cents(300),
                },
            })
            .unwrap(),
            "usage  2 document(s), 1 report(s), $3.00 credits"
        );
        assert!(StderrObserver::line(&LifecycleEvent::StateChanged {
            from: LifecycleState::Idle,
            to: LifecycleState::Collecting,
        })
        .is_none());
    }
}
