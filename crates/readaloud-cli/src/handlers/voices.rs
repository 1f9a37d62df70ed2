//! Voices command handler.

use anyhow::Result;
use readaloud_core::SpeechSettings;

/// Execute the voices command.
pub async fn execute(speech: &SpeechSettings) -> Result<()> {
    let voices = readaloud_voice::list_voices(speech).await?;
    if voices.is_empty() {
        println!("{} reported no voices", speech.engine);
        return Ok(());
    }

    println!("{:<24} {:<12} NAME", "ID", "LANGUAGE");
    for voice in voices {
        println!(
            "{:<24} {:<12} {}",
            voice.id,
            voice.language.as_deref().unwrap_or("-"),
            voice.name
        );
    }
    Ok(())
}
