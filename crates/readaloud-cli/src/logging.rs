//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter directive: `--verbose` forces debug, otherwise `RUST_LOG` or info.
fn filter_directive(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_owned();
    }
    rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("info")
        .to_owned()
}

/// Install the global fmt subscriber.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
