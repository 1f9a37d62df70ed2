//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::{Args, Parser};
use readaloud_core::{SpeechEngineKind, SpeechSettings};

use crate::commands::Commands;

/// Command-line interface for the PDF read-aloud service.
#[derive(Parser)]
#[command(name = "readaloud")]
#[command(about = "Read PDF books aloud, page by page")]
#[command(version)]
pub struct Cli {
    /// Directory whose sub-folders are scanned for books
    /// (default: READALOUD_LIBRARY_DIR, then the parent of the current directory)
    #[arg(long = "library-dir", global = true)]
    pub library_dir: Option<PathBuf>,

    #[command(flatten)]
    pub speech: SpeechArgs,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Speech engine options shared by every command.
#[derive(Args, Debug, Default)]
pub struct SpeechArgs {
    /// Speech engine: espeak-ng, espeak, say or native
    #[arg(long, env = "READALOUD_ENGINE", global = true)]
    pub engine: Option<SpeechEngineKind>,

    /// Speaking rate in words per minute
    #[arg(long, env = "READALOUD_RATE", global = true)]
    pub rate: Option<u32>,

    /// Output volume from 0.0 to 1.0
    #[arg(long, env = "READALOUD_VOLUME", global = true)]
    pub volume: Option<f32>,

    /// Voice identifier (see `readaloud voices`)
    #[arg(long, env = "READALOUD_VOICE", global = true)]
    pub voice: Option<String>,
}

impl SpeechArgs {
    /// Overlay the given options on the default speech settings.
    pub fn to_settings(&self) -> SpeechSettings {
        let defaults = SpeechSettings::default();
        SpeechSettings {
            engine: self.engine.unwrap_or(defaults.engine),
            rate_wpm: self.rate.unwrap_or(defaults.rate_wpm),
            volume: self.volume.unwrap_or(defaults.volume),
            voice: self.voice.clone().or(defaults.voice),
        }
    }
}
