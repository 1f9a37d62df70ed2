//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that delegate to `SessionController` or
//! `LibraryScanner`.

pub mod books;
pub mod reader;
