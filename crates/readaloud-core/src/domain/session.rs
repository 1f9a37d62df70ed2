//! Reading session state.
//!
//! There is exactly one session per process. It is owned by the
//! [`SessionController`](crate::services::SessionController) and never
//! handed out by reference; callers only ever see a [`SessionStatus`] copy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Mutable session record guarded by the controller's lock.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) book_path: Option<PathBuf>,
    pub(crate) book_name: Option<String>,
    pub(crate) current_page: usize,
    pub(crate) total_pages: usize,
    pub(crate) is_playing: bool,
    pub(crate) auto_continue: bool,
    /// Bumped by every playback dispatch, `stop` and `select`. A playback
    /// task only applies its completion if its captured value still matches.
    pub(crate) generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            book_path: None,
            book_name: None,
            current_page: 0,
            total_pages: 0,
            is_playing: false,
            auto_continue: true,
            generation: 0,
        }
    }
}

impl SessionState {
    /// Replace the selected book. `auto_continue` is left untouched.
    pub(crate) fn replace_book(&mut self, path: PathBuf, name: String, total_pages: usize) {
        self.book_path = Some(path);
        self.book_name = Some(name);
        self.total_pages = total_pages;
        self.current_page = 0;
        self.is_playing = false;
        self.generation += 1;
    }

    /// Invalidate any in-flight playback and return the new generation.
    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn book_path(&self) -> Option<&Path> {
        self.book_path.as_deref()
    }

    pub(crate) const fn has_next_page(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    pub(crate) fn snapshot(&self) -> SessionStatus {
        SessionStatus {
            book_path: self
                .book_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            book_name: self.book_name.clone(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            is_playing: self.is_playing,
            auto_continue: self.auto_continue,
        }
    }
}

/// Point-in-time copy of the session, as returned by `status()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Path of the selected document, if any.
    pub book_path: Option<String>,
    /// Display name of the selected document.
    pub book_name: Option<String>,
    /// Zero-based current page.
    pub current_page: usize,
    /// Page count of the selected document.
    pub total_pages: usize,
    /// Whether an utterance is believed to be speaking.
    pub is_playing: bool,
    /// Whether finishing a page advances the page index.
    pub auto_continue: bool,
}
