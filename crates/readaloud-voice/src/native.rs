//! Native platform speech via the `tts` crate.
//!
//! `tts::Tts` needs `&mut self` to speak and is not guaranteed to be usable
//! from arbitrary threads on every platform, so it lives on a dedicated
//! thread. [`NativeSpeechEngine`] is the `Send + Sync` handle that proxies
//! commands to it over a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use readaloud_core::{
    DEFAULT_SPEECH_RATE_WPM, SpeechError, SpeechPort, SpeechSettings, VoiceInfo,
};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use tts::Tts;

/// How often the speech thread checks for completion or interruption.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long an utterance may take to report as started before it is
/// treated as finished.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

// ── Commands ───────────────────────────────────────────────────────

enum NativeCommand {
    Speak {
        text: String,
        reply: oneshot::Sender<Result<(), SpeechError>>,
    },
    Voices {
        reply: oneshot::Sender<Result<Vec<VoiceInfo>, SpeechError>>,
    },
    /// Silence the synthesizer, including queued audio `speak` no longer watches.
    Stop,
    Shutdown,
}

// ── Handle ─────────────────────────────────────────────────────────

/// `Send + Sync` handle to the platform synthesizer thread.
pub struct NativeSpeechEngine {
    cmd_tx: mpsc::Sender<NativeCommand>,
    interrupted: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl NativeSpeechEngine {
    /// Spawn the speech thread and initialise the platform synthesizer.
    ///
    /// Initialisation errors are reported back from the thread.
    pub fn new(settings: &SpeechSettings) -> Result<Self, SpeechError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (init_tx, init_rx) = mpsc::channel();
        let interrupted = Arc::new(AtomicBool::new(false));

        let thread = {
            let settings = settings.clone();
            let interrupted = Arc::clone(&interrupted);
            thread::Builder::new()
                .name("readaloud-tts".into())
                .spawn(move || run(&settings, &cmd_rx, &interrupted, &init_tx))?
        };

        init_rx.recv().map_err(|_| thread_died())??;

        Ok(Self::from_parts(cmd_tx, interrupted, Some(thread)))
    }

    const fn from_parts(
        cmd_tx: mpsc::Sender<NativeCommand>,
        interrupted: Arc<AtomicBool>,
        thread: Option<thread::JoinHandle<()>>,
    ) -> Self {
        Self {
            cmd_tx,
            interrupted,
            thread,
        }
    }

    /// Voices offered by the platform synthesizer.
    pub async fn voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(NativeCommand::Voices { reply })
            .map_err(|_| thread_died())?;
        rx.await.map_err(|_| thread_died())?
    }
}

#[async_trait]
impl SpeechPort for NativeSpeechEngine {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        self.interrupted.store(false, Ordering::SeqCst);

        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(NativeCommand::Speak {
                text: text.to_owned(),
                reply,
            })
            .map_err(|_| thread_died())?;
        rx.await.map_err(|_| thread_died())?
    }

    fn interrupt(&self) -> Result<(), SpeechError> {
        // The flag ends a polled utterance; `Stop` covers audio that was
        // queued by a `speak` that has already returned.
        self.interrupted.store(true, Ordering::SeqCst);
        self.cmd_tx
            .send(NativeCommand::Stop)
            .map_err(|_| thread_died())
    }

    fn engine_name(&self) -> &str {
        "native"
    }
}

impl Drop for NativeSpeechEngine {
    fn drop(&mut self) {
        self.interrupted.store(true, Ordering::SeqCst);
        let _ = self.cmd_tx.send(NativeCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn thread_died() -> SpeechError {
    SpeechError::EngineFailed("speech thread exited".to_owned())
}

fn engine_failed(e: &tts::Error) -> SpeechError {
    SpeechError::EngineFailed(e.to_string())
}

// ── Speech thread ──────────────────────────────────────────────────

fn run(
    settings: &SpeechSettings,
    cmd_rx: &mpsc::Receiver<NativeCommand>,
    interrupted: &AtomicBool,
    init_tx: &mpsc::Sender<Result<(), SpeechError>>,
) {
    let mut tts = match init_tts(settings) {
        Ok(tts) => {
            let _ = init_tx.send(Ok(()));
            tts
        }
        Err(e) => {
            let _ = init_tx.send(Err(e));
            return;
        }
    };

    while let Ok(command) = cmd_rx.recv() {
        match command {
            NativeCommand::Speak { text, reply } => {
                let _ = reply.send(speak_blocking(&mut tts, &text, interrupted));
            }
            NativeCommand::Voices { reply } => {
                let _ = reply.send(list_voices(&tts));
            }
            NativeCommand::Stop => {
                if let Err(e) = tts.stop() {
                    debug!(error = %e, "Failed to stop platform synthesizer");
                }
            }
            NativeCommand::Shutdown => break,
        }
    }
    debug!("Speech thread exiting");
}

fn init_tts(settings: &SpeechSettings) -> Result<Tts, SpeechError> {
    let mut tts = Tts::default().map_err(|e| SpeechError::Unavailable(e.to_string()))?;
    let features = tts.supported_features();

    if features.rate {
        let rate = scaled_rate(
            settings.rate_wpm,
            tts.normal_rate(),
            tts.min_rate(),
            tts.max_rate(),
        );
        tts.set_rate(rate).map_err(|e| engine_failed(&e))?;
    }
    if features.volume {
        let volume = settings.volume.clamp(tts.min_volume(), tts.max_volume());
        tts.set_volume(volume).map_err(|e| engine_failed(&e))?;
    }
    if features.voice {
        let voices = tts.voices().map_err(|e| engine_failed(&e))?;
        let wanted = settings.voice.as_deref();
        match pick_voice(&voices, wanted, |v| (v.id(), v.name())) {
            Some(voice) => {
                debug!(voice = %voice.name(), "Using platform voice");
                tts.set_voice(voice).map_err(|e| engine_failed(&e))?;
            }
            None => {
                if let Some(wanted) = wanted {
                    warn!(voice = %wanted, "Voice not found, using platform default");
                }
            }
        }
    } else if settings.voice.is_some() {
        warn!("Platform synthesizer does not support voice selection");
    }

    Ok(tts)
}

/// The voice matching `wanted` by id or name, or the first voice offered
/// when none is configured.
fn pick_voice<'a, V>(
    voices: &'a [V],
    wanted: Option<&str>,
    id_and_name: impl Fn(&V) -> (String, String),
) -> Option<&'a V> {
    let Some(wanted) = wanted else {
        return voices.first();
    };
    voices.iter().find(|voice| {
        let (id, name) = id_and_name(voice);
        id == wanted || name == wanted
    })
}

fn speak_blocking(tts: &mut Tts, text: &str, interrupted: &AtomicBool) -> Result<(), SpeechError> {
    if interrupted.load(Ordering::SeqCst) {
        return Err(SpeechError::Interrupted);
    }

    tts.speak(text, true).map_err(|e| engine_failed(&e))?;
    if !tts.supported_features().is_speaking {
        // Completion cannot be observed; the utterance plays on unsupervised.
        return Ok(());
    }

    let started_at = Instant::now();
    let mut started = false;
    loop {
        thread::sleep(POLL_INTERVAL);

        if interrupted.load(Ordering::SeqCst) {
            if let Err(e) = tts.stop() {
                debug!(error = %e, "Failed to stop platform synthesizer");
            }
            return Err(SpeechError::Interrupted);
        }

        let speaking = tts.is_speaking().map_err(|e| engine_failed(&e))?;
        if speaking {
            started = true;
        } else if started || started_at.elapsed() >= STARTUP_GRACE {
            return Ok(());
        }
    }
}

fn list_voices(tts: &Tts) -> Result<Vec<VoiceInfo>, SpeechError> {
    let voices = tts.voices().map_err(|e| engine_failed(&e))?;
    Ok(voices
        .iter()
        .map(|voice| VoiceInfo {
            id: voice.id(),
            name: voice.name(),
            language: Some(voice.language().to_string()),
        })
        .collect())
}

/// Map words per minute onto the backend's rate scale, where
/// `normal` corresponds to the default 150 wpm.
#[allow(clippy::cast_precision_loss)]
fn scaled_rate(rate_wpm: u32, normal: f32, min: f32, max: f32) -> f32 {
    let factor = rate_wpm as f32 / DEFAULT_SPEECH_RATE_WPM as f32;
    (normal * factor).clamp(min, max)
}
