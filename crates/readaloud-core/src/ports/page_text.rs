//! Page text port: page counts and per-page text for a document.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to read an in-range page.
///
/// Out-of-range pages are not errors; they yield empty text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The document could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The extraction task itself failed (panicked or was cancelled).
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Port trait for page text extraction.
///
/// Methods are synchronous and may block on file IO and parsing; async
/// callers run them through `tokio::task::spawn_blocking`.
pub trait PageTextSource: Send + Sync {
    /// Number of pages in `document`, or 0 when it cannot be opened or parsed.
    fn page_count(&self, document: &Path) -> usize;

    /// Normalized text of the zero-based `page`.
    ///
    /// Returns an empty string when `page` is past the end of the document.
    fn extract_text(&self, document: &Path, page: usize) -> Result<String, ExtractionError>;
}
