#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod library;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod text;

// Re-export commonly used types for convenience
pub use domain::{BookSelection, PagePlayback, ReadOutcome, SessionStatus};
pub use library::{BookCatalog, BookEntry, LibraryError, LibraryScanner};
pub use paths::{
    LIBRARY_DIR_ENV, LibraryRootResolution, LibraryRootSource, PathError,
    default_excluded_dirs, resolve_library_root, resolve_reader_settings, service_root,
};
pub use ports::{ExtractionError, PageTextSource, SpeechError, SpeechPort, VoiceInfo};
pub use services::{ReaderError, SessionController};
pub use settings::{
    DEFAULT_SPEECH_RATE_WPM, DEFAULT_SPEECH_VOLUME, ReaderSettings, SettingsError,
    SpeechEngineKind, SpeechSettings,
};
pub use text::{PREVIEW_CHARS, normalize_page_text, text_preview};

