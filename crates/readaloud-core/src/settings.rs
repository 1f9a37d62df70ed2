//! Settings domain types and validation.
//!
//! Pure data with no infrastructure dependencies. Adapters build these from
//! CLI flags and environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default speaking rate in words per minute.
pub const DEFAULT_SPEECH_RATE_WPM: u32 = 150;

/// Default output volume (0.0 to 1.0).
pub const DEFAULT_SPEECH_VOLUME: f32 = 0.9;

/// Slowest rate accepted by validation.
pub const MIN_SPEECH_RATE_WPM: u32 = 40;

/// Fastest rate accepted by validation.
pub const MAX_SPEECH_RATE_WPM: u32 = 500;

/// Settings validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Unknown speech engine '{0}' (expected espeak-ng, espeak, say or native)")]
    UnknownEngine(String),

    #[error("Speech rate {0} wpm is outside {MIN_SPEECH_RATE_WPM}..={MAX_SPEECH_RATE_WPM}")]
    RateOutOfRange(u32),

    #[error("Speech volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),
}

/// Which speech backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechEngineKind {
    /// `espeak-ng` child process.
    #[default]
    EspeakNg,
    /// Legacy `espeak` child process.
    Espeak,
    /// macOS `say` child process.
    Say,
    /// Platform speech API through the `tts` crate (requires the `native` feature).
    Native,
}

impl SpeechEngineKind {
    /// Program name for process-based engines; `None` for `Native`.
    pub const fn program(self) -> Option<&'static str> {
        match self {
            Self::EspeakNg => Some("espeak-ng"),
            Self::Espeak => Some("espeak"),
            Self::Say => Some("say"),
            Self::Native => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EspeakNg => "espeak-ng",
            Self::Espeak => "espeak",
            Self::Say => "say",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for SpeechEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpeechEngineKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "espeak-ng" | "espeak_ng" => Ok(Self::EspeakNg),
            "espeak" => Ok(Self::Espeak),
            "say" => Ok(Self::Say),
            "native" => Ok(Self::Native),
            other => Err(SettingsError::UnknownEngine(other.to_owned())),
        }
    }
}

/// Speech engine configuration applied at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub engine: SpeechEngineKind,
    /// Speaking rate in words per minute.
    pub rate_wpm: u32,
    /// Output volume, 0.0 to 1.0.
    pub volume: f32,
    /// Voice identifier or name. When `None`, the native engine takes the
    /// first voice the platform lists and process engines use their default.
    pub voice: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::default(),
            rate_wpm: DEFAULT_SPEECH_RATE_WPM,
            volume: DEFAULT_SPEECH_VOLUME,
            voice: None,
        }
    }
}

impl SpeechSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_SPEECH_RATE_WPM..=MAX_SPEECH_RATE_WPM).contains(&self.rate_wpm) {
            return Err(SettingsError::RateOutOfRange(self.rate_wpm));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SettingsError::VolumeOutOfRange(self.volume));
        }
        Ok(())
    }
}

/// Everything the reader needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSettings {
    /// Directory whose sub-folders are scanned for books.
    pub library_root: PathBuf,
    /// Top-level folder names never scanned.
    pub excluded_dirs: Vec<String>,
    pub speech: SpeechSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speech_settings_are_valid() {
        let settings = SpeechSettings::default();
        assert_eq!(settings.rate_wpm, 150);
        assert!((settings.volume - 0.9).abs() < f32::EPSILON);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let slow = SpeechSettings {
            rate_wpm: 5,
            ..SpeechSettings::default()
        };
        assert_eq!(slow.validate(), Err(SettingsError::RateOutOfRange(5)));

        let loud = SpeechSettings {
            volume: 1.5,
            ..SpeechSettings::default()
        };
        assert_eq!(loud.validate(), Err(SettingsError::VolumeOutOfRange(1.5)));
    }

    #[test]
    fn test_engine_kind_parsing() {
        assert_eq!("espeak-ng".parse(), Ok(SpeechEngineKind::EspeakNg));
        assert_eq!(" SAY ".parse(), Ok(SpeechEngineKind::Say));
        assert_eq!("native".parse(), Ok(SpeechEngineKind::Native));
        assert_eq!(
            "festival".parse::<SpeechEngineKind>(),
            Err(SettingsError::UnknownEngine("festival".to_owned()))
        );
    }

    #[test]
    fn test_engine_program_names() {
        assert_eq!(SpeechEngineKind::EspeakNg.program(), Some("espeak-ng"));
        assert_eq!(SpeechEngineKind::Native.program(), None);
    }
}
