//! CLI entry point.
//!
//! Parses arguments, resolves settings once and routes to the handlers.

use clap::{CommandFactory, Parser};

use readaloud_cli::handlers::serve::ServeOptions;
use readaloud_cli::{Cli, Commands, handlers, init_logging, reader_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from a local .env act as defaults for the env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve {
            host,
            port,
            static_dir,
            allowed_origins,
        } => {
            let settings = reader_settings(&cli)?;
            let options = ServeOptions {
                host: host.clone(),
                port: *port,
                static_dir: static_dir.clone(),
                allowed_origins: allowed_origins.clone(),
            };
            handlers::serve::execute(settings, options).await?;
        }
        Commands::Books { json } => {
            let settings = reader_settings(&cli)?;
            handlers::books::execute(&settings, *json)?;
        }
        Commands::Pages { file, page } => {
            handlers::pages::execute(file, *page)?;
        }
        Commands::Voices => {
            let settings = reader_settings(&cli)?;
            handlers::voices::execute(&settings.speech).await?;
        }
    }

    Ok(())
}
