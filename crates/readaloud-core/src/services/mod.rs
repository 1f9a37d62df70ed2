//! Core services.
//!
//! Services own domain state and depend only on ports, never on adapters.

pub mod session_controller;

pub use session_controller::{ReaderError, SessionController};
