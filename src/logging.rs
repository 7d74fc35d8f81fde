//! Logging bootstrap.
//!
//! Diagnostics go to stderr so `--json` output on stdout stays clean.
//! `RUST_LOG` wins over the level passed in.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle, default_format};

/// Starts the global logger. Keep the handle alive for the process lifetime.
pub fn init_logging(level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .format(default_format)
        .start()
}
