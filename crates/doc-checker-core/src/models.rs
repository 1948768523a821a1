//! Core data models used throughout Doc Checker.
//!
//! These types represent the uploaded documents, the contradictions an
//! analysis source reports, the analysis result and report snapshots, and
//! the usage counters that billing mutates.
//!
//! Serialized field names are camelCase. Reports saved by the browser front
//! end carry no `generatedAt`; they load with the analysis timestamp in its
//! place.

use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accepted document formats, matched on the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Pdf, DocumentKind::Docx, DocumentKind::Txt];

    /// Resolve the kind from a filename. The extension is the text after the
    /// last `.` and is compared case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }

    /// MIME type used when forwarding the blob to a remote analysis service.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain",
        }
    }
}

/// A file offered for upload, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub content: Vec<u8>,
}

impl DocumentCandidate {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }

    /// A candidate that only carries metadata (sample documents, previews).
    pub fn metadata_only(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content: Vec::new(),
        }
    }
}

/// A validated document held in the active batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub size_bytes: u64,
    pub kind: DocumentKind,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected inconsistency between two or more documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Short category of the conflict, e.g. `"Time Conflict"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub suggestion: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Contradiction {
    /// Check the invariants a source must uphold. Returns a description of
    /// the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} of '{}' is outside [0, 1]",
                self.confidence, self.kind
            ));
        }
        if self.kind.trim().is_empty() {
            return Err("contradiction without a type".to_string());
        }
        Ok(())
    }

    /// Confidence as a whole percentage, rounded half away from zero.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Counts of contradictions by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeveritySummary {
    pub fn from_contradictions(contradictions: &[Contradiction]) -> Self {
        let mut summary = SeveritySummary {
            total: contradictions.len(),
            ..Default::default()
        };
        for c in contradictions {
            match c.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }
}

/// Output of one successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub contradictions: Vec<Contradiction>,
    pub summary: SeveritySummary,
    pub timestamp: DateTime<Utc>,
    pub files_analyzed: Vec<String>,
}

impl AnalysisResult {
    pub fn new(
        contradictions: Vec<Contradiction>,
        files_analyzed: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let summary = SeveritySummary::from_contradictions(&contradictions);
        Self {
            contradictions,
            summary,
            timestamp,
            files_analyzed,
        }
    }
}

/// An immutable snapshot of an analysis result, as persisted to the
/// report store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredReport")]
pub struct Report {
    pub id: u64,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// A report as read back from a store, where `generatedAt` may be missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReport {
    id: u64,
    title: String,
    #[serde(default)]
    generated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    analysis: AnalysisResult,
}

impl From<StoredReport> for Report {
    fn from(stored: StoredReport) -> Self {
        Report {
            id: stored.id,
            title: stored.title,
            generated_at: stored.generated_at.unwrap_or(stored.analysis.timestamp),
            analysis: stored.analysis,
        }
    }
}

impl Report {
    pub fn title_for(sequence: u64) -> String {
        format!("Analysis Report #{}", sequence)
    }
}

/// A billing amount, held as whole cents so repeated charges never drift.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Credits(u64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    pub const fn from_cents(cents: u64) -> Self {
        Credits(cents)
    }

    /// Convert a dollar amount, rounding to the nearest cent. Returns `None`
    /// for negative, NaN, or infinite input.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() || dollars < 0.0 {
            return None;
        }
        Some(Credits((dollars * 100.0).round() as u64))
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Credits {
    type Output = Credits;

    fn add(self, rhs: Credits) -> Credits {
        Credits(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Credits {
    fn add_assign(&mut self, rhs: Credits) {
        *self = *self + rhs;
    }
}

impl Mul<u64> for Credits {
    type Output = Credits;

    fn mul(self, rhs: u64) -> Credits {
        Credits(self.0.saturating_mul(rhs))
    }
}

/// Per-action prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Charged once per document in a successful analysis.
    pub document_analysis: Credits,
    /// Flat charge per generated report.
    pub report_generation: Credits,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            document_analysis: Credits::from_cents(50),
            report_generation: Credits::from_cents(200),
        }
    }
}

/// Running usage counters. Only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub documents_analyzed: u64,
    pub reports_generated: u64,
    pub credits_used: Credits,
}

impl UsageCounters {
    pub fn record_analysis(&mut self, batch_size: u64, pricing: &Pricing) {
        self.documents_analyzed += batch_size;
        self.credits_used += pricing.document_analysis * batch_size;
    }

    /// Charge one report and return its sequence number.
    pub fn record_report(&mut self, pricing: &Pricing) -> u64 {
        self.reports_generated += 1;
        self.credits_used += pricing.report_generation;
        self.reports_generated
    }
}
