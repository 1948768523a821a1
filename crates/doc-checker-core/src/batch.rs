//! The upload batch: the ordered set of documents selected for analysis.
//!
//! # Rules
//!
//! Checked in this order for each candidate:
//!
//! - A name already in the batch (or earlier in the same offer) is skipped
//!   as a duplicate, whatever its type or size.
//! - Only `pdf`, `docx`, and `txt` files are accepted (case-insensitive).
//! - Files larger than [`BatchLimits::max_file_bytes`] are rejected.
//! - An offer that would push the batch past [`BatchLimits::max_documents`]
//!   is refused as a whole; nothing from it is added.
//!
//! Rejections of individual files never abort the offer: the remaining valid
//! files are still added.

use std::collections::HashSet;

use crate::error::LifecycleError;
use crate::models::{Document, DocumentCandidate, DocumentKind};

/// 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_DOCUMENTS: usize = 3;
pub const DEFAULT_MIN_DOCUMENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_documents: usize,
    pub min_documents: usize,
    pub max_file_bytes: u64,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_MAX_DOCUMENTS,
            min_documents: DEFAULT_MIN_DOCUMENTS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// What happened to an accepted offer of candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOutcome {
    /// Names appended to the batch, in order.
    pub added: Vec<String>,
    /// Names skipped because they were already present.
    pub duplicates: Vec<String>,
    /// Candidates refused for their type or size.
    pub rejected: Vec<LifecycleError>,
}

#[derive(Debug, Clone, Default)]
pub struct Batch {
    documents: Vec<Document>,
    limits: BatchLimits,
}

impl Batch {
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            documents: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.iter().any(|d| d.name == name)
    }

    pub fn total_bytes(&self) -> u64 {
        self.documents.iter().map(|d| d.size_bytes).sum()
    }

    pub fn can_analyze(&self) -> bool {
        self.documents.len() >= self.limits.min_documents
    }

    /// Validate and append candidates.
    ///
    /// Returns [`LifecycleError::CapacityExceeded`] without touching the
    /// batch when the accepted candidates do not fit.
    pub fn add(&mut self, candidates: Vec<DocumentCandidate>) -> Result<AddOutcome, LifecycleError> {
        let mut outcome = AddOutcome::default();
        let mut accepted: Vec<Document> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for candidate in candidates {
            if self.contains(&candidate.name) || !seen.insert(candidate.name.clone()) {
                outcome.duplicates.push(candidate.name);
                continue;
            }
            let kind = match DocumentKind::from_name(&candidate.name) {
                Some(kind) => kind,
                None => {
                    outcome.rejected.push(LifecycleError::InvalidFileType {
                        name: candidate.name,
                    });
                    continue;
                }
            };
            if candidate.size_bytes > self.limits.max_file_bytes {
                outcome.rejected.push(LifecycleError::FileTooLarge {
                    name: candidate.name,
                    size_bytes: candidate.size_bytes,
                    max_bytes: self.limits.max_file_bytes,
                });
                continue;
            }
            accepted.push(Document {
                name: candidate.name,
                size_bytes: candidate.size_bytes,
                kind,
                content: candidate.content,
            });
        }

        if self.documents.len() + accepted.len() > self.limits.max_documents {
            return Err(LifecycleError::CapacityExceeded {
                current: self.documents.len(),
                incoming: accepted.len(),
                max: self.limits.max_documents,
            });
        }

        outcome.added = accepted.iter().map(|d| d.name.clone()).collect();
        self.documents.extend(accepted);
        Ok(outcome)
    }

    pub fn remove(&mut self, name: &str) -> Option<Document> {
        let pos = self.documents.iter().position(|d| d.name == name)?;
        Some(self.documents.remove(pos))
    }

    /// Empty the batch, returning how many documents were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.documents.len();
        self.documents.clear();
        n
    }
}
