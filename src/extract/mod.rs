//! Text extraction from resume files

pub mod pdf;
pub mod plain;

pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;

use crate::{Error, Result};
use std::path::Path;

/// Extensions `extractor_for_path` has an extractor for.
pub const EXTRACTABLE_EXTENSIONS: &[&str] = &[".pdf", ".txt", ".md"];

pub trait TextExtractor: Send + Sync {
    /// Extracts all text from an in-memory document.
    fn extract(&self, bytes: &[u8]) -> Result<String>;

    fn format_name(&self) -> &str;
}

/// Lower-cased extension with a leading dot, e.g. `.pdf`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

pub fn extractor_for_path(path: &Path) -> Result<Box<dyn TextExtractor>> {
    match extension_of(path).as_deref() {
        Some(".pdf") => Ok(Box::new(PdfExtractor::new())),
        Some(".txt") | Some(".md") => Ok(Box::new(PlainTextExtractor::new())),
        _ => Err(Error::UnsupportedFormat(path.display().to_string())),
    }
}

/// Reads a file into memory and extracts its text.
pub fn extract_file(path: &Path, max_file_bytes: u64) -> Result<String> {
    let extractor = extractor_for_path(path)?;

    let size = std::fs::metadata(path)?.len();
    if size > max_file_bytes {
        return Err(Error::Extraction(format!(
            "file is {size} bytes, larger than the {max_file_bytes} byte limit"
        )));
    }

    let bytes = std::fs::read(path)?;
    let text = extractor.extract(&bytes)?;
    tracing::debug!(
        "[EXTRACT] {} ({}): {} bytes -> {} chars",
        path.display(),
        extractor.format_name(),
        bytes.len(),
        text.chars().count()
    );
    Ok(text)
}
