//! `SessionController`: the reading-session state machine.
//!
//! Owns the single [`SessionState`] and coordinates page extraction, speech
//! dispatch and auto-continue.
//!
//! # Locking discipline
//!
//! - `state` is a std mutex. It is held for field reads and writes and for
//!   the synchronous `interrupt` in `stop`, never across an `.await`.
//! - `nav_lock` serialises `select`, `read_page`, `next` and `previous`, so
//!   each read-extract-write sequence is atomic with respect to the others.
//!   `stop`, `status` and `toggle_auto_continue` never take it.
//! - `playback_slot` is held by a playback task for the whole of `speak`.
//!   At most one utterance is in flight at any time.
//!
//! # Generations
//!
//! Every dispatch, `stop` and `select` bumps `SessionState::generation`. A
//! playback task captures the generation it was dispatched with and applies
//! its completion only if that value is still current. Dispatch and `stop`
//! also publish the new generation on `preempt_tx`; a task that sees a newer
//! published value interrupts its own utterance. `select` does not publish,
//! so selecting a book leaves current audio running but discards its
//! completion.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{BookSelection, PagePlayback, ReadOutcome, SessionState, SessionStatus};
use crate::ports::{ExtractionError, PageTextSource, SpeechError, SpeechPort};
use crate::text::text_preview;

/// Display name used when neither the caller nor the file provides one.
const UNKNOWN_BOOK_NAME: &str = "Unknown";

/// Errors returned by session commands.
///
/// Boundary conditions are not errors; see [`ReadOutcome`].
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The selected path does not resolve to a document.
    #[error("Book not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A page was requested before any book was selected.
    #[error("No book selected")]
    NoBookSelected,

    /// The speech engine failed to initialise at startup.
    #[error("TTS engine not initialized")]
    ServiceUnavailable,

    /// Reading an in-range page failed.
    #[error("Error reading page: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Coordinates the reading session.
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    pages: Arc<dyn PageTextSource>,
    /// `None` when the engine failed to initialise.
    speech: Option<Arc<dyn SpeechPort>>,
    nav_lock: tokio::sync::Mutex<()>,
    playback_slot: Arc<tokio::sync::Mutex<()>>,
    preempt_tx: watch::Sender<u64>,
}

impl SessionController {
    /// Create a controller with no book selected.
    pub fn new(pages: Arc<dyn PageTextSource>, speech: Option<Arc<dyn SpeechPort>>) -> Self {
        let state = SessionState::default();
        let (preempt_tx, _) = watch::channel(state.generation);
        Self {
            state: Arc::new(Mutex::new(state)),
            pages,
            speech,
            nav_lock: tokio::sync::Mutex::new(()),
            playback_slot: Arc::new(tokio::sync::Mutex::new(())),
            preempt_tx,
        }
    }

    /// Whether a speech engine is available for `read_page`.
    pub fn is_speech_available(&self) -> bool {
        self.speech.is_some()
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    /// Select a book and reset the session position.
    pub async fn select(
        &self,
        path: impl Into<PathBuf>,
        name: Option<String>,
    ) -> Result<BookSelection, ReaderError> {
        let path = path.into();
        let _nav = self.nav_lock.lock().await;
        let Some(total_pages) = self.count_pages(path.clone()).await else {
            return Err(ReaderError::NotFound(path));
        };
        let book_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name(&path));

        self.lock_state()
            .replace_book(path.clone(), book_name.clone(), total_pages);

        info!(path = %path.display(), book_name, total_pages, "Book selected");
        Ok(BookSelection {
            book_name,
            total_pages,
            current_page: 0,
        })
    }

    /// Read `page` aloud, or the current page when `page` is `None`.
    pub async fn read_page(&self, page: Option<usize>) -> Result<ReadOutcome, ReaderError> {
        let _nav = self.nav_lock.lock().await;
        self.read_page_locked(page).await
    }

    /// Read the page after the current one.
    pub async fn next(&self) -> Result<ReadOutcome, ReaderError> {
        let _nav = self.nav_lock.lock().await;
        let target = {
            let state = self.lock_state();
            if !state.has_next_page() {
                return Ok(ReadOutcome::EndOfBook);
            }
            state.current_page + 1
        };
        self.read_page_locked(Some(target)).await
    }

    /// Read the page before the current one.
    pub async fn previous(&self) -> Result<ReadOutcome, ReaderError> {
        let _nav = self.nav_lock.lock().await;
        let target = {
            let state = self.lock_state();
            if state.current_page == 0 {
                return Ok(ReadOutcome::AtFirstPage);
            }
            state.current_page - 1
        };
        self.read_page_locked(Some(target)).await
    }

    /// Stop playback. Idempotent; engine failures are swallowed.
    pub fn stop(&self) {
        let mut state = self.lock_state();
        state.is_playing = false;
        let generation = state.bump_generation();
        self.preempt_tx.send_replace(generation);

        // Interrupt under the state lock so no newer dispatch can start
        // speaking before this reaches the engine.
        if let Some(speech) = &self.speech {
            if let Err(e) = speech.interrupt() {
                debug!(error = %e, "Ignoring speech interrupt failure");
            }
        }
        drop(state);
        info!("Playback stopped");
    }

    /// Snapshot of the current session.
    pub fn status(&self) -> SessionStatus {
        self.lock_state().snapshot()
    }

    /// Flip auto-continue and return the new value.
    pub fn toggle_auto_continue(&self) -> bool {
        let mut state = self.lock_state();
        state.auto_continue = !state.auto_continue;
        debug!(auto_continue = state.auto_continue, "Auto-continue toggled");
        state.auto_continue
    }

    // Caller must hold `nav_lock`.
    async fn read_page_locked(&self, page: Option<usize>) -> Result<ReadOutcome, ReaderError> {
        let (book_path, page, total_pages) = {
            let state = self.lock_state();
            let path = state
                .book_path()
                .ok_or(ReaderError::NoBookSelected)?
                .to_path_buf();
            (path, page.unwrap_or(state.current_page), state.total_pages)
        };
        let speech = self
            .speech
            .clone()
            .ok_or(ReaderError::ServiceUnavailable)?;

        if page >= total_pages {
            debug!(page, total_pages, "Requested page is past the end of the book");
            return Ok(ReadOutcome::EndOfBook);
        }

        let text = self.extract(book_path, page).await?;
        if text.trim().is_empty() {
            debug!(page, "Page has no extractable text");
            return Ok(ReadOutcome::NoText);
        }

        let generation = {
            let mut state = self.lock_state();
            state.current_page = page;
            state.is_playing = true;
            let generation = state.bump_generation();
            self.preempt_tx.send_replace(generation);
            generation
        };

        let text_preview = text_preview(&text);
        self.dispatch_playback(speech, text, page, generation);

        Ok(ReadOutcome::Started(PagePlayback {
            page,
            text_preview,
            is_playing: true,
        }))
    }

    /// Spawn the background task that speaks `text` and applies completion.
    fn dispatch_playback(
        &self,
        speech: Arc<dyn SpeechPort>,
        text: String,
        page: usize,
        generation: u64,
    ) {
        let state = Arc::clone(&self.state);
        let slot = Arc::clone(&self.playback_slot);
        let preempt_rx = self.preempt_tx.subscribe();

        tokio::spawn(async move {
            let _slot = slot.lock().await;
            if lock_state(&state).generation != generation {
                debug!(page, generation, "Playback superseded before it started");
                return;
            }

            info!(page, generation, engine = speech.engine_name(), "Playback started");
            // The utterance runs in its own task so a panicking engine is
            // reported as a failure and still resets `is_playing`.
            let utterance = tokio::spawn(async move {
                speak_until_preempted(speech.as_ref(), &text, preempt_rx, generation).await
            });
            let result = match utterance.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(page, generation, error = %e, "Playback task aborted");
                    Err(SpeechError::EngineFailed(e.to_string()))
                }
            };
            complete_playback(&state, page, generation, result);
        });
    }

    /// Page count of `path`, or `None` when it is not a regular file.
    async fn count_pages(&self, path: PathBuf) -> Option<usize> {
        let pages = Arc::clone(&self.pages);
        let counted =
            tokio::task::spawn_blocking(move || path.is_file().then(|| pages.page_count(&path)))
                .await;
        match counted {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Page count task failed");
                Some(0)
            }
        }
    }

    async fn extract(&self, path: PathBuf, page: usize) -> Result<String, ExtractionError> {
        let pages = Arc::clone(&self.pages);
        tokio::task::spawn_blocking(move || pages.extract_text(&path, page))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

/// Speak `text`, interrupting the engine if a newer generation is published.
///
/// The speak future is polled first so the engine has registered the
/// utterance before any interrupt is sent.
async fn speak_until_preempted(
    speech: &dyn SpeechPort,
    text: &str,
    mut preempt_rx: watch::Receiver<u64>,
    generation: u64,
) -> Result<(), SpeechError> {
    let speak = speech.speak(text);
    tokio::pin!(speak);

    tokio::select! {
        biased;
        result = &mut speak => result,
        () = preempted(&mut preempt_rx, generation) => {
            debug!(generation, "Playback preempted, interrupting engine");
            if let Err(e) = speech.interrupt() {
                debug!(error = %e, "Ignoring speech interrupt failure");
            }
            speak.await
        }
    }
}

/// Resolves once a generation other than `generation` is published.
async fn preempted(rx: &mut watch::Receiver<u64>, generation: u64) {
    if rx.wait_for(|latest| *latest != generation).await.is_err() {
        // Controller dropped: nothing can preempt this utterance any more.
        std::future::pending::<()>().await;
    }
}

/// Apply the effects of a finished utterance, unless it has gone stale.
fn complete_playback(
    state: &Mutex<SessionState>,
    page: usize,
    generation: u64,
    result: Result<(), SpeechError>,
) {
    let mut state = lock_state(state);
    if state.generation != generation {
        debug!(page, generation, current = state.generation, "Discarding stale playback completion");
        return;
    }

    state.is_playing = false;
    match result {
        Ok(()) => {
            // Index-only advance: the next page is not spoken from here.
            if state.auto_continue && state.has_next_page() {
                state.current_page += 1;
                info!(page, next_page = state.current_page, "Playback finished, advanced page");
            } else {
                info!(page, "Playback finished");
            }
        }
        Err(SpeechError::Interrupted) => {
            debug!(page, "Playback interrupted");
        }
        Err(e) => {
            warn!(page, error = %e, "Playback failed");
        }
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| UNKNOWN_BOOK_NAME.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_file_stem() {
        assert_eq!(display_name(Path::new("/books/Horus Rising.pdf")), "Horus Rising");
    }

    #[test]
    fn test_display_name_falls_back_to_unknown() {
        assert_eq!(display_name(Path::new("/")), UNKNOWN_BOOK_NAME);
    }

    #[test]
    fn test_reader_error_messages() {
        assert_eq!(ReaderError::NoBookSelected.to_string(), "No book selected");
        assert_eq!(
            ReaderError::NotFound(PathBuf::from("/missing.pdf")).to_string(),
            "Book not found: /missing.pdf"
        );
    }

    #[tokio::test]
    async fn test_preempted_ignores_own_generation() {
        let (tx, mut rx) = watch::channel(3_u64);
        let wait = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            preempted(&mut rx, 3),
        )
        .await;
        assert!(wait.is_err(), "own generation must not preempt");

        tx.send_replace(4);
        preempted(&mut rx, 3).await;
    }
}
