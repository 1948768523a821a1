//! Small formatting helpers shared by presentation layers.

use crate::models::{Document, DocumentKind};

/// Human-readable size in base-1024 units with at most two decimals and no
/// trailing zeros: `0 Bytes`, `500 Bytes`, `1000 KB`, `1.95 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

pub fn kind_icon(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Pdf => "📄",
        DocumentKind::Docx => "📝",
        DocumentKind::Txt => "📃",
    }
}

/// One-line card for a batch entry: icon, name, size.
pub fn document_line(doc: &Document) -> String {
    format!(
        "{} {} ({})",
        kind_icon(doc.kind),
        doc.name,
        format_file_size(doc.size_bytes)
    )
}
