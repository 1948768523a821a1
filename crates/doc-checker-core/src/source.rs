//! Analysis source abstraction and the built-in mock source.
//!
//! An [`AnalysisSource`] turns a batch of documents into contradiction
//! records. The controller does not care where they come from:
//!
//! - **[`MockSource`]** picks findings from a fixed sample table.
//! - The native host adds a delegated source that forwards the documents to
//!   an external HTTP analysis service.
//!
//! Tests substitute their own implementation to script results or failures.

use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use rand_core::{OsRng, RngCore};

use crate::models::{Contradiction, Document, Severity};

/// A provider of contradiction findings.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use doc_checker_core::models::{Contradiction, Document};
/// use doc_checker_core::source::AnalysisSource;
///
/// pub struct NothingFound;
///
/// #[async_trait]
/// impl AnalysisSource for NothingFound {
///     fn name(&self) -> &str { "nothing" }
///
///     async fn analyze(&self, _documents: &[Document]) -> Result<Vec<Contradiction>> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait AnalysisSource: Send + Sync {
    /// Identifier used in logs and the CLI (e.g. `"mock"`, `"delegated"`).
    fn name(&self) -> &str;

    /// Analyze the documents. An error aborts the analysis with its message
    /// shown to the user.
    async fn analyze(&self, documents: &[Document]) -> Result<Vec<Contradiction>>;
}

/// Number of entries in the sample table.
pub const SAMPLE_COUNT: usize = 5;

/// The fixed findings the mock source draws from.
pub fn sample_contradictions() -> Vec<Contradiction> {
    vec![
        Contradiction {
            id: Some(1),
            kind: "Attendance Policy Conflict".to_string(),
            severity: Severity::High,
            description: "Minimum attendance requirement differs between documents.".to_string(),
            details: "One document requires 75% attendance to sit final exams while the other states 70% is sufficient.".to_string(),
            sources: vec!["student_handbook.docx".to_string(), "college_rules.txt".to_string()],
            suggestion: "Confirm the current attendance threshold with the academic office and update the outdated document.".to_string(),
            confidence: 0.94,
        },
        Contradiction {
            id: Some(2),
            kind: "Deadline Conflict".to_string(),
            severity: Severity::High,
            description: "Project submission deadlines do not match.".to_string(),
            details: "The guidelines set the final submission for week 12, but the handbook lists week 14.".to_string(),
            sources: vec!["project_guidelines.pdf".to_string(), "student_handbook.docx".to_string()],
            suggestion: "Publish a single authoritative academic calendar and reference it from both documents.".to_string(),
            confidence: 0.89,
        },
        Contradiction {
            id: Some(3),
            kind: "Grading Criteria Conflict".to_string(),
            severity: Severity::Medium,
            description: "Weighting of the final project differs.".to_string(),
            details: "The final project is worth 40% of the grade in one document and 30% in the other.".to_string(),
            sources: vec!["project_guidelines.pdf".to_string(), "college_rules.txt".to_string()],
            suggestion: "Align the grading breakdown and note the effective term of the change.".to_string(),
            confidence: 0.81,
        },
        Contradiction {
            id: Some(4),
            kind: "Team Size Conflict".to_string(),
            severity: Severity::Medium,
            description: "Maximum project team size is inconsistent.".to_string(),
            details: "Teams of up to 4 students are allowed by the guidelines; the rules cap teams at 3.".to_string(),
            sources: vec!["project_guidelines.pdf".to_string(), "college_rules.txt".to_string()],
            suggestion: "Decide on one team size limit and state any exceptions explicitly.".to_string(),
            confidence: 0.76,
        },
        Contradiction {
            id: Some(5),
            kind: "Terminology Mismatch".to_string(),
            severity: Severity::Low,
            description: "The same review board is referred to by different names.".to_string(),
            details: "\"Academic Review Board\" and \"Student Affairs Committee\" appear to describe the same body.".to_string(),
            sources: vec!["student_handbook.docx".to_string(), "college_rules.txt".to_string()],
            suggestion: "Use one official name and add a glossary entry for the former name.".to_string(),
            confidence: 0.62,
        },
    ]
}

enum Selection {
    Random(Mutex<Box<dyn RngCore + Send>>),
    Fixed(usize),
}

/// Local stand-in for a real analysis backend.
///
/// Each call returns between one and three sample findings. The `sources`
/// of every finding are rewritten to names from the analyzed batch so the
/// results refer to the uploaded files.
pub struct MockSource {
    selection: Selection,
}

impl MockSource {
    /// Random selection of 1..=3 findings using the operating system RNG.
    pub fn random() -> Self {
        Self::with_rng(Box::new(OsRng))
    }

    /// Random selection driven by the given generator.
    pub fn with_rng(rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            selection: Selection::Random(Mutex::new(rng)),
        }
    }

    /// Always return the first `count` sample findings (clamped to
    /// `1..=SAMPLE_COUNT`).
    pub fn fixed(count: usize) -> Self {
        Self {
            selection: Selection::Fixed(count.clamp(1, SAMPLE_COUNT)),
        }
    }

    fn pick(&self) -> Vec<Contradiction> {
        let mut samples = sample_contradictions();
        match &self.selection {
            Selection::Fixed(n) => {
                samples.truncate(*n);
                samples
            }
            Selection::Random(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                let count = 1 + (rng.next_u32() as usize % 3);
                // Partial Fisher-Yates: the first `count` slots end up random.
                for i in 0..count {
                    let remaining = samples.len() - i;
                    let j = i + (rng.next_u32() as usize % remaining);
                    samples.swap(i, j);
                }
                samples.truncate(count);
                samples
            }
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::random()
    }
}

#[async_trait]
impl AnalysisSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, documents: &[Document]) -> Result<Vec<Contradiction>> {
        let mut picked = self.pick();
        if documents.len() >= 2 {
            for (i, c) in picked.iter_mut().enumerate() {
                let a = &documents[i % documents.len()].name;
                let b = &documents[(i + 1) % documents.len()].name;
                c.sources = vec![a.clone(), b.clone()];
            }
        }
        tracing::debug!(findings = picked.len(), "mock source produced findings");
        Ok(picked)
    }
}
