/// Structured logging to a file.
///
/// The terminal is owned by the renderer (raw mode, alternate screen), so
/// log lines go to the file named in `config.toml` instead of stderr.
/// `RUST_LOG` overrides the configured filter.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber. Returns false if the log file could
/// not be created; the game then runs without logging.
pub fn init(cfg: &LogConfig) -> bool {
    let file = match File::create(&cfg.file) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
