//! Domain types for the reading session.

pub mod outcome;
pub mod session;

pub use outcome::{BookSelection, PagePlayback, ReadOutcome};
pub use session::{SessionState, SessionStatus};
