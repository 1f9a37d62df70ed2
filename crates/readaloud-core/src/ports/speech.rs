//! Speech port: the single-slot text-to-speech service.
//!
//! # Design Rules
//!
//! - One utterance at a time per instance. The port does not queue; callers
//!   (the session controller) own the slot and must never overlap `speak`.
//! - `interrupt` is best-effort and may be called from any task while a
//!   `speak` future is pending on another.

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by speech engines.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The engine could not be found or initialised.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The utterance was cut short by `interrupt`.
    #[error("Utterance interrupted")]
    Interrupted,

    /// The engine ran but reported a failure.
    #[error("Speech engine failed: {0}")]
    EngineFailed(String),

    /// IO error talking to the engine.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A voice offered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VoiceInfo {
    /// Identifier accepted by the engine's voice option.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Language tag, when the engine reports one.
    pub language: Option<String>,
}

/// Port trait for the speech service.
///
/// Implemented by the engines in `readaloud-voice`; consumed by
/// [`SessionController`](crate::services::SessionController).
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Speak `text`, resolving once the utterance finishes or is interrupted.
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;

    /// Ask any in-flight utterance to stop promptly.
    fn interrupt(&self) -> Result<(), SpeechError>;

    /// Short engine label for logs and status output.
    fn engine_name(&self) -> &str;
}
