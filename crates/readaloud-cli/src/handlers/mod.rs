//! Command handlers.
//!
//! Each handler executes one CLI subcommand.

pub mod books;
pub mod pages;
pub mod serve;
pub mod voices;
