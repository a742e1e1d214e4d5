//! Diagnostic logging bootstrap
//!
//! Logs go to stderr so command output on stdout stays clean. Messages are
//! metadata only (`event=... key=...`); record contents are never logged.

use crate::error::{LifeosError, Result};
use flexi_logger::{Logger, LoggerHandle};
use std::sync::OnceLock;

pub const LOG_ENV: &str = "LIFEOS_LOG";

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Log specification for a `-v` count
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Start the stderr logger once per process.
///
/// `LIFEOS_LOG` (a flexi_logger spec such as `debug` or
/// `lifeos::infrastructure=trace`) overrides `default_spec`.
pub fn init_logging(default_spec: &str) -> Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let spec = std::env::var(LOG_ENV).unwrap_or_else(|_| default_spec.to_string());
    let handle = Logger::try_with_str(&spec)
        .map_err(|e| LifeosError::Config(format!("Invalid log level '{}': {}", spec, e)))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|e| LifeosError::Config(format!("Failed to start logger: {}", e)))?;

    if LOGGER.set(handle).is_err() {
        log::debug!("event=logging_init status=already_set");
    }
    Ok(())
}
