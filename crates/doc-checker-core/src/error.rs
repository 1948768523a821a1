//! Typed errors surfaced by the analysis controller.
//!
//! Every variant is recoverable: the controller stays usable after any of
//! them. Duplicate uploads are not represented here because they are
//! skipped silently and reported in [`AddOutcome`](crate::batch::AddOutcome).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{name} is not a supported file type (allowed: pdf, docx, txt)")]
    InvalidFileType { name: String },

    #[error("{name} is {size_bytes} bytes, above the {max_bytes} byte limit")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    #[error("You can upload a maximum of {max} documents ({current} in batch, {incoming} more offered)")]
    CapacityExceeded {
        current: usize,
        incoming: usize,
        max: usize,
    },

    #[error("Please upload at least {min} documents for analysis ({count} uploaded)")]
    InsufficientDocuments { count: usize, min: usize },

    #[error("{0}")]
    AnalysisSourceFailure(String),

    #[error("report persistence failed: {0}")]
    PersistenceFailure(String),
}

impl LifecycleError {
    /// Short heading for a user-visible notification.
    pub fn title(&self) -> &'static str {
        match self {
            LifecycleError::InvalidFileType { .. } => "Unsupported File",
            LifecycleError::FileTooLarge { .. } => "File Too Large",
            LifecycleError::CapacityExceeded { .. } => "Too Many Files",
            LifecycleError::InsufficientDocuments { .. } => "Insufficient Files",
            LifecycleError::AnalysisSourceFailure(_) => "Analysis Failed",
            LifecycleError::PersistenceFailure(_) => "Reports Not Saved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_limits() {
        let err = LifecycleError::CapacityExceeded {
            current: 2,
            incoming: 2,
            max: 3,
        };
        assert!(err.to_string().contains("maximum of 3"));
        assert_eq!(err.title(), "Too Many Files");

        let err = LifecycleError::InsufficientDocuments { count: 1, min: 2 };
        assert!(err.to_string().contains("at least 2"));
    }
}
