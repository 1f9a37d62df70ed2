//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::Subcommand;
use readaloud_axum::{DEFAULT_HOST, DEFAULT_PORT};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Interface to bind
        #[arg(long, env = "READALOUD_HOST", default_value = DEFAULT_HOST)]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "READALOUD_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Directory of front-end assets to serve with an index.html fallback
        #[arg(long, env = "READALOUD_STATIC_DIR")]
        static_dir: Option<PathBuf>,
        /// Restrict CORS to these origins (repeatable; default allows all)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// List the books found in the library
    Books {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a PDF's page count, or the text of one page
    Pages {
        /// Path to the PDF file
        file: PathBuf,
        /// Zero-based page to print
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// List the voices offered by the speech engine
    Voices,
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use crate::commands::Commands;
    use clap::Parser;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["readaloud", "serve"]);
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                static_dir,
                allowed_origins,
            }) => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8000);
                assert!(static_dir.is_none());
                assert!(allowed_origins.is_empty());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_pages_args() {
        let cli = Cli::parse_from(["readaloud", "pages", "/srv/books/a.pdf", "--page", "3"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Pages { page: Some(3), .. })
        ));
    }
}
