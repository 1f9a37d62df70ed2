//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use readaloud_core::{
    LibraryScanner, PageTextSource, ReaderSettings, SessionController, SpeechPort,
    SpeechSettings, resolve_reader_settings, service_root,
};
use readaloud_pdf::PdfTextSource;
use readaloud_voice::build_speech_engine;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Library and speech settings.
    pub settings: ReaderSettings,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default paths, relative to the current directory.
    pub fn with_defaults() -> Result<Self> {
        let root = service_root()?;
        Ok(Self::new(resolve_reader_settings(
            None,
            &root,
            SpeechSettings::default(),
        )?))
    }

    /// Create config for `settings` with the default host, port and CORS.
    pub fn new(settings: ReaderSettings) -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            settings,
            static_dir: None,
            cors: CorsConfig::default(),
        }
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The reading session.
    pub controller: Arc<SessionController>,
    /// Book discovery over the configured library root.
    pub library: LibraryScanner,
}

impl AxumContext {
    /// Assemble a context from already-built parts.
    pub const fn new(controller: Arc<SessionController>, library: LibraryScanner) -> Self {
        Self {
            controller,
            library,
        }
    }
}

/// Wire the PDF source, speech engine and controller for `settings`.
///
/// A speech engine that fails to start is logged and left out; reads then
/// fail with `ServiceUnavailable` instead of the server refusing to start.
pub fn bootstrap(settings: &ReaderSettings) -> AxumContext {
    info!(
        target: "readaloud.paths",
        library_root = %settings.library_root.display(),
        excluded_dirs = ?settings.excluded_dirs,
        "Axum bootstrap resolved paths"
    );

    let pages: Arc<dyn PageTextSource> = Arc::new(PdfTextSource::new());
    let speech: Option<Arc<dyn SpeechPort>> = match build_speech_engine(&settings.speech) {
        Ok(engine) => Some(engine),
        Err(e) => {
            error!(engine = %settings.speech.engine, error = %e, "TTS initialization failed");
            None
        }
    };

    let controller = Arc::new(SessionController::new(pages, speech));
    let library = LibraryScanner::new(
        settings.library_root.clone(),
        settings.excluded_dirs.clone(),
    );
    AxumContext::new(controller, library)
}

/// Start the web server.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config.settings);

    // Choose router based on whether static serving is configured
    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    if config.static_dir.is_some() {
        info!("readaloud web server (with UI) listening on http://{}", addr);
    } else {
        info!("readaloud web server (API only) listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("readaloud web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
