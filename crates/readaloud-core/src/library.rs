//! Book discovery.
//!
//! The library is the set of PDF files found recursively under each
//! top-level directory of the library root. Hidden directories and the
//! configured exclusions (normally the service's own directory) are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File extension recognised as a book.
const BOOK_EXTENSION: &str = "pdf";

/// Errors raised while scanning the library root.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library root does not exist or is not a directory.
    #[error("Library root {0} is not a directory")]
    RootNotFound(PathBuf),

    /// The library root could not be listed.
    #[error("Failed to read library root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A discovered book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    /// File stem, used as the display name.
    pub name: String,
    /// Full path, accepted by `select`.
    pub path: String,
    /// Path relative to the library root.
    pub relative_path: String,
    /// File size in bytes.
    pub size: u64,
}

/// Books grouped by top-level folder name, each list sorted by name.
pub type BookCatalog = BTreeMap<String, Vec<BookEntry>>;

/// Scans a library root for books.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    root: PathBuf,
    excluded_dirs: Vec<String>,
}

impl LibraryScanner {
    pub fn new(root: impl Into<PathBuf>, excluded_dirs: Vec<String>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the library and group books by top-level folder.
    ///
    /// Folders without any books are omitted. Unreadable entries below the
    /// top level are logged and skipped.
    pub fn scan(&self) -> Result<BookCatalog, LibraryError> {
        if !self.root.is_dir() {
            return Err(LibraryError::RootNotFound(self.root.clone()));
        }

        let entries = fs::read_dir(&self.root).map_err(|source| LibraryError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut catalog = BookCatalog::new();
        for entry in entries.flatten() {
            let folder = entry.path();
            if !folder.is_dir() {
                continue;
            }
            let folder_name = entry.file_name().to_string_lossy().into_owned();
            if self.is_skipped(&folder_name) {
                debug!(folder = %folder_name, "Skipping library folder");
                continue;
            }

            let mut books = self.scan_folder(&folder);
            if books.is_empty() {
                continue;
            }
            books.sort_by(|a, b| a.name.cmp(&b.name));
            catalog.insert(folder_name, books);
        }

        Ok(catalog)
    }

    fn is_skipped(&self, folder_name: &str) -> bool {
        folder_name.starts_with('.') || self.excluded_dirs.iter().any(|d| d == folder_name)
    }

    fn scan_folder(&self, folder: &Path) -> Vec<BookEntry> {
        let mut books = Vec::new();
        for entry in WalkDir::new(folder) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(folder = %folder.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_book(entry.path()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            books.push(BookEntry {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: path.to_string_lossy().into_owned(),
                relative_path: relative.to_string_lossy().into_owned(),
                size,
            });
        }
        books
    }
}

fn is_book(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BOOK_EXTENSION))
}
