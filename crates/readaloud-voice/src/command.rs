//! Process-backed speech engines (`espeak-ng`, `espeak`, `say`).
//!
//! Each utterance runs one child process with the page text piped to its
//! stdin. The process is killed on interrupt and when the `speak` future is
//! dropped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use readaloud_core::{SpeechEngineKind, SpeechError, SpeechPort, SpeechSettings};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to the utterance currently in flight.
struct ActiveUtterance {
    id: u64,
    cancel: CancellationToken,
}

/// Speech engine that shells out to a command-line synthesizer.
pub struct CommandSpeechEngine {
    label: String,
    program: PathBuf,
    args: Vec<String>,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveUtterance>>,
}

impl CommandSpeechEngine {
    /// Locate the engine's executable on `PATH` and prepare its arguments.
    pub fn new(settings: &SpeechSettings) -> Result<Self, SpeechError> {
        let program_name = settings.engine.program().ok_or_else(|| {
            SpeechError::Unavailable(format!("{} is not a command engine", settings.engine))
        })?;
        let program = which::which(program_name).map_err(|e| {
            SpeechError::Unavailable(format!("{program_name} not found on PATH: {e}"))
        })?;
        debug!(engine = %settings.engine, program = %program.display(), "Using command speech engine");

        Ok(Self::with_program(
            settings.engine.label(),
            program,
            command_args(settings),
        ))
    }

    /// Build an engine around an explicit executable and argument list.
    pub fn with_program(label: impl Into<String>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args,
            next_id: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveUtterance>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new utterance, cancelling any stale one left behind.
    fn begin(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let previous = self.active().replace(ActiveUtterance {
            id,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            previous.cancel.cancel();
        }
        (id, cancel)
    }

    fn finish(&self, id: u64) {
        let mut active = self.active();
        if active.as_ref().is_some_and(|a| a.id == id) {
            *active = None;
        }
    }

    fn spawn(&self) -> Result<Child, SpeechError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SpeechError::Unavailable(format!("failed to start {}: {e}", self.program.display()))
            })
    }

    async fn run(&self, text: &str, cancel: &CancellationToken) -> Result<(), SpeechError> {
        let mut child = self.spawn()?;
        let finished = tokio::select! {
            () = cancel.cancelled() => None,
            status = feed_and_wait(&mut child, text) => Some(status),
        };

        match finished {
            None => {
                if let Err(e) = child.kill().await {
                    debug!(error = %e, "Engine process already exited");
                }
                Err(SpeechError::Interrupted)
            }
            Some(Ok(status)) if status.success() => Ok(()),
            Some(Ok(status)) => Err(SpeechError::EngineFailed(format!(
                "{} exited with {status}",
                self.label
            ))),
            Some(Err(e)) => Err(SpeechError::Io(e)),
        }
    }
}

#[async_trait]
impl SpeechPort for CommandSpeechEngine {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        // Registered before the first await so an interrupt is never lost.
        let (id, cancel) = self.begin();

        let result = self.run(text, &cancel).await;
        self.finish(id);
        result
    }

    fn interrupt(&self) -> Result<(), SpeechError> {
        if let Some(active) = self.active().take() {
            debug!(engine = %self.label, utterance = active.id, "Interrupting utterance");
            active.cancel.cancel();
        }
        Ok(())
    }

    fn engine_name(&self) -> &str {
        &self.label
    }
}

/// Pipe `text` into the child's stdin, close it, and wait for exit.
async fn feed_and_wait(child: &mut Child, text: &str) -> std::io::Result<ExitStatus> {
    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()).await {
            Ok(()) => {}
            // The exit status reports why the engine stopped reading.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                warn!("Engine closed stdin before reading all text");
            }
            Err(e) => return Err(e),
        }
        drop(stdin);
    }
    child.wait().await
}

/// Command-line arguments for a process engine.
///
/// `espeak`/`espeak-ng` take amplitude 0..=200 with 100 as normal, so the
/// 0.0..=1.0 volume maps to 0..=100. `say` has no volume option.
pub fn command_args(settings: &SpeechSettings) -> Vec<String> {
    let mut args = Vec::new();
    match settings.engine {
        SpeechEngineKind::EspeakNg | SpeechEngineKind::Espeak => {
            args.extend(["-s".to_owned(), settings.rate_wpm.to_string()]);
            args.extend(["-a".to_owned(), amplitude(settings.volume).to_string()]);
            if let Some(voice) = &settings.voice {
                args.extend(["-v".to_owned(), voice.clone()]);
            }
            args.push("--stdin".to_owned());
        }
        SpeechEngineKind::Say => {
            args.extend(["-r".to_owned(), settings.rate_wpm.to_string()]);
            if let Some(voice) = &settings.voice {
                args.extend(["-v".to_owned(), voice.clone()]);
            }
            args.extend(["-f".to_owned(), "-".to_owned()]);
        }
        SpeechEngineKind::Native => {}
    }
    args
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn amplitude(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}
