//! Results of session commands.
//!
//! Expected boundary conditions (end of book, empty page, first page) are
//! ordinary values here, not errors.

use serde::Serialize;

/// Playback that was dispatched for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlayback {
    /// Zero-based page now being read.
    pub page: usize,
    /// First characters of the page text, with an ellipsis when truncated.
    pub text_preview: String,
    /// Always `true` when returned; playback runs in the background.
    pub is_playing: bool,
}

/// Outcome of `read_page`, `next` and `previous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Speech was dispatched for a page.
    Started(PagePlayback),
    /// The requested page is past the last page.
    EndOfBook,
    /// The page had no text after normalization.
    NoText,
    /// `previous` was requested on the first page.
    AtFirstPage,
}

impl ReadOutcome {
    /// Whether playback was started.
    pub const fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Message for soft outcomes; `None` when playback started.
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Started(_) => None,
            Self::EndOfBook => Some("End of book reached"),
            Self::NoText => Some("No text found on this page"),
            Self::AtFirstPage => Some("Already at first page"),
        }
    }
}

/// Result of selecting a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSelection {
    pub book_name: String,
    pub total_pages: usize,
    pub current_page: usize,
}
