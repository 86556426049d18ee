//! Logging setup shared by the tapsflow binaries.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::{ConfigError, FlowResult};

/// Maps CLI verbosity flags to a maximum level: quiet shows errors only,
/// then INFO, DEBUG and TRACE for 0, 1 and 2+ `-v`.
pub fn log_level(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Installs the process-wide fmt subscriber writing to stderr. `RUST_LOG`
/// takes precedence over the flags when set.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> FlowResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose, quiet).as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|err| Box::new(ConfigError(format!("failed to initialize logging: {err}"))))?;

    Ok(())
}
