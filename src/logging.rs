//! Structured logging setup
//!
//! The filter comes from `STAGECHAIN_LOG` when set (same syntax as
//! `RUST_LOG`), otherwise from the verbosity requested on the command line.
//! Logs go to stderr so command output stays machine-readable.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "STAGECHAIN_LOG";

static INIT: Once = Once::new();

/// Map `-v` occurrences to a level
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            let level = level_for_verbosity(verbose).to_string().to_lowercase();
            EnvFilter::new(format!("stagechain={level}"))
        });

        // Keeps any global subscriber installed before us
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
