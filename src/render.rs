//! Text, Markdown, and JSON rendering of results and reports.

use std::fmt::Write;

use anyhow::Result;

use doc_checker_core::alerts::{AlertStatus, PathwayAlert};
use doc_checker_core::models::{AnalysisResult, Contradiction, Report, UsageCounters};

/// Multi-line card for one finding.
pub fn contradiction_card(c: &Contradiction) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  ({}% confidence)",
        c.severity.as_str().to_uppercase(),
        c.kind,
        c.confidence_percent()
    );
    let _ = writeln!(out, "  {}", c.description);
    if !c.details.is_empty() {
        let _ = writeln!(out, "  {}", c.details);
    }
    if !c.sources.is_empty() {
        let _ = writeln!(out, "  Sources: {}", c.sources.join(", "));
    }
    if !c.suggestion.is_empty() {
        let _ = writeln!(out, "  Suggested resolution: {}", c.suggestion);
    }
    out
}

pub fn result_text(result: &AnalysisResult) -> String {
    let s = &result.summary;
    let mut out = format!(
        "Found {} contradiction(s): {} high, {} medium, {} low\nFiles: {}\n",
        s.total,
        s.high,
        s.medium,
        s.low,
        result.files_analyzed.join(", ")
    );
    for c in &result.contradictions {
        out.push('\n');
        out.push_str(&contradiction_card(c));
    }
    out
}

pub fn usage_text(usage: &UsageCounters) -> String {
    format!(
        "Documents analyzed: {}\nReports generated: {}\nCredits used: {}\n",
        usage.documents_analyzed, usage.reports_generated, usage.credits_used
    )
}

/// One line per report in the list view.
pub fn report_list_line(report: &Report) -> String {
    format!(
        "{}  {}  {}  {} contradiction(s)",
        report.id,
        report.generated_at.format("%Y-%m-%d %H:%M:%S"),
        report.title,
        report.analysis.summary.total
    )
}

pub fn report_text(report: &Report) -> String {
    format!(
        "{}\nGenerated: {}\n\n{}",
        report.title,
        report.generated_at.to_rfc3339(),
        result_text(&report.analysis)
    )
}

/// The downloadable Markdown form of a report.
pub fn report_markdown(report: &Report) -> String {
    let a = &report.analysis;
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", report.title);
    let _ = writeln!(out, "- **Generated:** {}", report.generated_at.to_rfc3339());
    let _ = writeln!(out, "- **Analyzed at:** {}", a.timestamp.to_rfc3339());
    let _ = writeln!(out, "- **Files:** {}\n", a.files_analyzed.join(", "));
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Severity | Count |");
    let _ = writeln!(out, "|----------|-------|");
    let _ = writeln!(out, "| High | {} |", a.summary.high);
    let _ = writeln!(out, "| Medium | {} |", a.summary.medium);
    let _ = writeln!(out, "| Low | {} |", a.summary.low);
    let _ = writeln!(out, "| **Total** | **{}** |\n", a.summary.total);
    let _ = writeln!(out, "## Contradictions");
    if a.contradictions.is_empty() {
        let _ = writeln!(out, "\nNo contradictions found.");
    }
    for (i, c) in a.contradictions.iter().enumerate() {
        let _ = writeln!(out, "\n### {}. {} ({})\n", i + 1, c.kind, c.severity);
        let _ = writeln!(out, "{}\n", c.description);
        if !c.details.is_empty() {
            let _ = writeln!(out, "{}\n", c.details);
        }
        let _ = writeln!(out, "- **Confidence:** {}%", c.confidence_percent());
        if !c.sources.is_empty() {
            let _ = writeln!(out, "- **Sources:** {}", c.sources.join(", "));
        }
        if !c.suggestion.is_empty() {
            let _ = writeln!(out, "- **Suggested resolution:** {}", c.suggestion);
        }
    }
    out
}

/// The persisted JSON form of a report, pretty-printed.
pub fn report_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn alert_line(alert: &PathwayAlert) -> String {
    let marker = match alert.status {
        AlertStatus::Alert => "ALERT",
        AlertStatus::Ok => "ok",
    };
    format!(
        "{}  [{}] {}: {}\n    {}",
        alert.timestamp.format("%Y-%m-%d %H:%M"),
        marker,
        alert.source,
        alert.change,
        alert.impact
    )
}
