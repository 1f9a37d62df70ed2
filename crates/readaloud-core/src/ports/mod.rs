//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the session controller expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.

pub mod page_text;
pub mod speech;

pub use page_text::{ExtractionError, PageTextSource};
pub use speech::{SpeechError, SpeechPort, VoiceInfo};
