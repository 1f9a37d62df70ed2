//! Serve command handler.

use std::path::PathBuf;

use anyhow::Result;
use readaloud_axum::{ServerConfig, start_server};
use readaloud_core::ReaderSettings;

/// Options for the serve command.
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

/// Build the server configuration for `settings` and `options`.
pub fn server_config(settings: ReaderSettings, options: ServeOptions) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(settings);
    config.host = options.host;
    config.port = options.port;

    if let Some(dir) = options.static_dir {
        if !dir.join("index.html").is_file() {
            anyhow::bail!("Static directory {} has no index.html", dir.display());
        }
        config = config.with_static_dir(dir);
    }
    if !options.allowed_origins.is_empty() {
        config = config.with_allowed_origins(options.allowed_origins);
    }
    Ok(config)
}

/// Execute the serve command. Runs until Ctrl-C.
pub async fn execute(settings: ReaderSettings, options: ServeOptions) -> Result<()> {
    start_server(server_config(settings, options)?).await
}
