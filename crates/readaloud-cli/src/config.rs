//! Resolve runtime settings from parsed arguments.

use anyhow::{Context, Result};
use readaloud_core::{ReaderSettings, resolve_reader_settings, service_root};

use crate::parser::Cli;

/// Build [`ReaderSettings`] for this invocation.
///
/// The library root follows flag > `READALOUD_LIBRARY_DIR` > parent of the
/// current directory. Speech settings are validated here so a bad rate or
/// volume fails fast.
pub fn reader_settings(cli: &Cli) -> Result<ReaderSettings> {
    let root = service_root()?;
    let speech = cli.speech.to_settings();
    speech.validate().context("Invalid speech settings")?;

    let settings = resolve_reader_settings(cli.library_dir.as_deref(), &root, speech)?;
    tracing::debug!(
        service_root = %root.display(),
        library_root = %settings.library_root.display(),
        engine = %settings.speech.engine,
        "Resolved settings"
    );
    Ok(settings)
}
