//! `PdfTextSource`: the `PageTextSource` adapter over `lopdf`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use lopdf::Document;
use readaloud_core::{ExtractionError, PageTextSource, normalize_page_text};
use tracing::{debug, warn};

/// A parsed document and the file identity it was parsed from.
struct CachedDocument {
    path: PathBuf,
    modified: Option<SystemTime>,
    document: Arc<Document>,
}

/// PDF page text extractor.
///
/// Keeps the most recently parsed document so consecutive pages of the same
/// book do not re-parse the file. The cache entry is dropped when the file's
/// modification time changes.
#[derive(Default)]
pub struct PdfTextSource {
    cache: Mutex<Option<CachedDocument>>,
}

impl PdfTextSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, reusing the cached parse when the file is unchanged.
    fn load(&self, path: &Path) -> Result<Arc<Document>, ExtractionError> {
        let modified = fs::metadata(path)
            .map_err(|source| ExtractionError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .modified()
            .ok();

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref() {
            if cached.path == path && cached.modified == modified {
                return Ok(Arc::clone(&cached.document));
            }
        }

        let bytes = fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Document::load_mem(&bytes).map_err(|e| ExtractionError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), pages = document.get_pages().len(), "Parsed PDF");

        let document = Arc::new(document);
        *cache = Some(CachedDocument {
            path: path.to_path_buf(),
            modified,
            document: Arc::clone(&document),
        });
        Ok(document)
    }
}

impl PageTextSource for PdfTextSource {
    fn page_count(&self, document: &Path) -> usize {
        match self.load(document) {
            Ok(doc) => doc.get_pages().len(),
            Err(e) => {
                warn!(error = %e, "Could not count pages");
                0
            }
        }
    }

    fn extract_text(&self, document: &Path, page: usize) -> Result<String, ExtractionError> {
        let doc = self.load(document)?;

        // lopdf numbers pages from 1; the port is zero-based.
        let Some(&page_number) = doc.get_pages().keys().nth(page) else {
            debug!(page, "Page index past end of document");
            return Ok(String::new());
        };

        let raw = doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractionError::Parse {
                path: document.to_path_buf(),
                reason: format!("page {page_number}: {e}"),
            })?;
        Ok(normalize_page_text(&raw))
    }
}
