//! Library root resolution.
//!
//! The service runs from its own directory; books live in the sibling
//! directories next to it. The library root is therefore the parent of the
//! service root unless overridden.

mod error;
#[cfg(test)]
pub(crate) mod test_utils;

use std::env;
use std::path::{Path, PathBuf};

pub use error::PathError;

use crate::settings::{ReaderSettings, SpeechSettings};

/// Environment variable overriding the library root.
pub const LIBRARY_DIR_ENV: &str = "READALOUD_LIBRARY_DIR";

/// How the library root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryRootSource {
    /// Passed explicitly (CLI flag).
    Explicit,
    /// Read from `READALOUD_LIBRARY_DIR` / `.env`.
    EnvVar,
    /// Parent of the service root.
    ServiceParent,
}

/// Resolution result for the library root.
#[derive(Debug, Clone)]
pub struct LibraryRootResolution {
    pub path: PathBuf,
    pub source: LibraryRootSource,
}

/// The service's own root: the current working directory.
pub fn service_root() -> Result<PathBuf, PathError> {
    env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))
}

/// Resolve the library root.
///
/// Resolution order:
/// 1. Explicit path provided by caller
/// 2. `READALOUD_LIBRARY_DIR` environment variable
/// 3. Parent of `service_root`
///
/// Relative paths are taken relative to `service_root`.
pub fn resolve_library_root(
    explicit: Option<&Path>,
    service_root: &Path,
) -> Result<LibraryRootResolution, PathError> {
    if let Some(path) = explicit {
        return Ok(LibraryRootResolution {
            path: anchor(path, service_root)?,
            source: LibraryRootSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(LIBRARY_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(LibraryRootResolution {
                path: anchor(Path::new(env_path.trim()), service_root)?,
                source: LibraryRootSource::EnvVar,
            });
        }
    }

    let parent = service_root
        .parent()
        .ok_or_else(|| PathError::NoParentDir(service_root.to_path_buf()))?;
    Ok(LibraryRootResolution {
        path: parent.to_path_buf(),
        source: LibraryRootSource::ServiceParent,
    })
}

/// Folder names excluded from scanning: the service's own directory.
pub fn default_excluded_dirs(service_root: &Path) -> Vec<String> {
    service_root
        .file_name()
        .map(|name| vec![name.to_string_lossy().into_owned()])
        .unwrap_or_default()
}

/// Build [`ReaderSettings`] for a service running from `service_root`.
pub fn resolve_reader_settings(
    explicit_library_root: Option<&Path>,
    service_root: &Path,
    speech: SpeechSettings,
) -> Result<ReaderSettings, PathError> {
    let library = resolve_library_root(explicit_library_root, service_root)?;
    tracing::debug!(
        library_root = %library.path.display(),
        source = ?library.source,
        "Resolved library root"
    );
    Ok(ReaderSettings {
        library_root: library.path,
        excluded_dirs: default_excluded_dirs(service_root),
        speech,
    })
}

fn anchor(path: &Path, service_root: &Path) -> Result<PathBuf, PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(service_root.join(path))
    }
}
