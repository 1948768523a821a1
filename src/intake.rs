//! Turning paths on disk into upload candidates.

use std::path::Path;

use anyhow::{Context, Result};

use doc_checker_core::models::DocumentCandidate;

/// Read each path into a candidate named after its file name.
///
/// Files larger than `max_file_bytes` are not read; they become metadata-only
/// candidates so the batch can reject them with a proper message.
pub async fn read_candidates<P: AsRef<Path>>(
    paths: &[P],
    max_file_bytes: u64,
) -> Result<Vec<DocumentCandidate>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Not a file path: {}", path.display()))?;
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("Not a regular file: {}", path.display());
        }
        if meta.len() > max_file_bytes {
            candidates.push(DocumentCandidate::metadata_only(name, meta.len()));
            continue;
        }
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        candidates.push(DocumentCandidate::new(name, content));
    }
    Ok(candidates)
}

/// The three built-in sample documents used by `doc-checker demo`.
pub fn sample_documents() -> Vec<DocumentCandidate> {
    vec![
        DocumentCandidate::metadata_only("project_guidelines.pdf", 1_024_000),
        DocumentCandidate::metadata_only("student_handbook.docx", 2_048_000),
        DocumentCandidate::metadata_only("college_rules.txt", 512_000),
    ]
}
