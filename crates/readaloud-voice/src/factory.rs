//! Engine construction from settings.

use std::sync::Arc;

use readaloud_core::{SpeechEngineKind, SpeechError, SpeechPort, SpeechSettings, VoiceInfo};
use tokio::process::Command;
use tracing::info;

use crate::command::CommandSpeechEngine;
use crate::voices::{parse_espeak_voices, parse_say_voices};

/// Build the speech engine selected by `settings`.
///
/// Fails with [`SpeechError::Unavailable`] when the settings are invalid,
/// the engine's executable is missing, or the `native` feature is off.
pub fn build_speech_engine(settings: &SpeechSettings) -> Result<Arc<dyn SpeechPort>, SpeechError> {
    settings
        .validate()
        .map_err(|e| SpeechError::Unavailable(e.to_string()))?;

    let engine: Arc<dyn SpeechPort> = match settings.engine {
        SpeechEngineKind::Native => native_engine(settings)?,
        _ => Arc::new(CommandSpeechEngine::new(settings)?),
    };
    info!(
        engine = engine.engine_name(),
        rate_wpm = settings.rate_wpm,
        volume = settings.volume,
        voice = settings.voice.as_deref().unwrap_or("default"),
        "Speech engine ready"
    );
    Ok(engine)
}

#[cfg(feature = "native")]
fn native_engine(settings: &SpeechSettings) -> Result<Arc<dyn SpeechPort>, SpeechError> {
    Ok(Arc::new(crate::native::NativeSpeechEngine::new(settings)?))
}

#[cfg(not(feature = "native"))]
fn native_engine(_settings: &SpeechSettings) -> Result<Arc<dyn SpeechPort>, SpeechError> {
    Err(native_disabled())
}

#[cfg(not(feature = "native"))]
fn native_disabled() -> SpeechError {
    SpeechError::Unavailable("built without the `native` feature".to_owned())
}

/// List the voices offered by the engine selected by `settings`.
pub async fn list_voices(settings: &SpeechSettings) -> Result<Vec<VoiceInfo>, SpeechError> {
    match settings.engine {
        SpeechEngineKind::EspeakNg | SpeechEngineKind::Espeak => {
            let output = run_listing(settings.engine, &["--voices"]).await?;
            Ok(parse_espeak_voices(&output))
        }
        SpeechEngineKind::Say => {
            let output = run_listing(settings.engine, &["-v", "?"]).await?;
            Ok(parse_say_voices(&output))
        }
        #[cfg(feature = "native")]
        SpeechEngineKind::Native => {
            crate::native::NativeSpeechEngine::new(settings)?
                .voices()
                .await
        }
        #[cfg(not(feature = "native"))]
        SpeechEngineKind::Native => Err(native_disabled()),
    }
}

async fn run_listing(kind: SpeechEngineKind, args: &[&str]) -> Result<String, SpeechError> {
    let program_name = kind.program().ok_or_else(|| {
        SpeechError::Unavailable(format!("{kind} is not a command engine"))
    })?;
    let program = which::which(program_name)
        .map_err(|e| SpeechError::Unavailable(format!("{program_name} not found on PATH: {e}")))?;

    let output = Command::new(program).args(args).output().await?;
    if !output.status.success() {
        return Err(SpeechError::EngineFailed(format!(
            "{program_name} exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = SpeechSettings {
            rate_wpm: 0,
            ..SpeechSettings::default()
        };
        let err = build_speech_engine(&settings).err().unwrap();
        assert!(matches!(err, SpeechError::Unavailable(msg) if msg.contains("rate")));
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_native_without_feature_is_unavailable() {
        let settings = SpeechSettings {
            engine: SpeechEngineKind::Native,
            ..SpeechSettings::default()
        };
        let err = build_speech_engine(&settings).err().unwrap();
        assert!(matches!(err, SpeechError::Unavailable(msg) if msg.contains("native")));
    }
}
