//! Command implementations behind the `doc-checker` binary.
//!
//! Each `run_*` function loads what it needs, drives an
//! [`AnalysisController`], and prints results to stdout. Lifecycle events go
//! to the selected observer on stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use doc_checker_core::alerts::sample_alerts;
use doc_checker_core::display::document_line;
use doc_checker_core::models::{AnalysisResult, DocumentCandidate, UsageCounters};
use doc_checker_core::source::{AnalysisSource, MockSource};
use doc_checker_core::store::ReportStore;
use doc_checker_core::AnalysisController;

use crate::config::Config;
use crate::delegate::create_source;
use crate::intake::{read_candidates, sample_documents};
use crate::observer::ObserverMode;
use crate::render;
use crate::store_file::FileReportStore;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    source: &'a str,
    result: &'a AnalysisResult,
    usage: UsageCounters,
    reports: Vec<ReportRef>,
}

#[derive(Serialize)]
struct ReportRef {
    id: u64,
    title: String,
}

/// Build a controller with the configured limits, pricing, and storage,
/// and restore persisted reports.
pub async fn open_controller(
    cfg: &Config,
    source: Arc<dyn AnalysisSource>,
    mode: ObserverMode,
) -> Result<AnalysisController> {
    let store: Arc<dyn ReportStore> = Arc::new(FileReportStore::from_config(&cfg.storage));
    let mut controller = AnalysisController::new(cfg.controller_config()?, source, store);
    controller.subscribe(mode.observer());
    controller.initialize().await;
    Ok(controller)
}

/// Analyze files from disk and optionally generate reports.
pub async fn run_analyze(
    cfg: &Config,
    files: &[PathBuf],
    reports: u32,
    json: bool,
    mode: ObserverMode,
) -> Result<()> {
    let source = create_source(&cfg.analysis)?;
    let candidates = read_candidates(files, cfg.limits.max_file_bytes).await?;
    run_batch(cfg, source, candidates, reports, json, mode).await
}

/// Run the full flow on the built-in sample documents with the mock source.
pub async fn run_demo(cfg: &Config, reports: u32, mode: ObserverMode) -> Result<()> {
    let source: Arc<dyn AnalysisSource> = match cfg.analysis.mock_findings {
        Some(n) => Arc::new(MockSource::fixed(n)),
        None => Arc::new(MockSource::random()),
    };
    run_batch(cfg, source, sample_documents(), reports, false, mode).await
}

async fn run_batch(
    cfg: &Config,
    source: Arc<dyn AnalysisSource>,
    candidates: Vec<DocumentCandidate>,
    reports: u32,
    json: bool,
    mode: ObserverMode,
) -> Result<()> {
    let mut controller = open_controller(cfg, source, mode).await?;

    let outcome = controller.add_documents(candidates)?;
    for name in &outcome.duplicates {
        eprintln!("skipped duplicate: {}", name);
    }
    for err in &outcome.rejected {
        eprintln!("skipped: {}", err);
    }

    controller.start_analysis().await?;

    let mut generated = Vec::new();
    for _ in 0..reports {
        if let Some(report) = controller.generate_report().await {
            generated.push(ReportRef {
                id: report.id,
                title: report.title.clone(),
            });
        }
    }

    let result = controller
        .current_result()
        .context("analysis finished without a result")?;

    if json {
        let out = AnalyzeOutput {
            source: controller.source_name(),
            result,
            usage: *controller.usage(),
            reports: generated,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Documents:");
    for doc in controller.batch().documents() {
        println!("  {}", document_line(doc));
    }
    println!();
    print!("{}", render::result_text(result));
    println!();
    print!("{}", render::usage_text(controller.usage()));
    for r in &generated {
        println!("Report saved: {} (id {})", r.title, r.id);
    }
    Ok(())
}

pub async fn run_reports_list(cfg: &Config) -> Result<()> {
    let store = FileReportStore::from_config(&cfg.storage);
    let reports = store.load().await?.unwrap_or_default();
    if reports.is_empty() {
        println!("No reports.");
        return Ok(());
    }
    for report in &reports {
        println!("{}", render::report_list_line(report));
    }
    Ok(())
}

pub async fn run_reports_show(cfg: &Config, id: u64, format: ReportFormat) -> Result<()> {
    let store = FileReportStore::from_config(&cfg.storage);
    let reports = store.load().await?.unwrap_or_default();
    let report = reports
        .iter()
        .find(|r| r.id == id)
        .with_context(|| format!("No report with id {}", id))?;
    match format {
        ReportFormat::Text => print!("{}", render::report_text(report)),
        ReportFormat::Markdown => print!("{}", render::report_markdown(report)),
        ReportFormat::Json => println!("{}", render::report_json(report)?),
    }
    Ok(())
}

pub fn run_alerts() {
    for alert in sample_alerts() {
        println!("{}", render::alert_line(&alert));
    }
}
