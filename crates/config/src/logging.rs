//! Logging configuration for fmtgate
//!
//! Terminal output goes to stderr so formatter diffs and version listings on
//! stdout stay machine-readable. An optional log file receives everything at
//! debug level.

use crate::Result;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events pass the default filter
const LOG_TARGETS: [&str; 4] = ["fmtgate", "fmtgate_core", "fmtgate_config", "fmtgate_engine"];

/// Default filter directives for the given verbosity
///
/// `RUST_LOG` takes precedence over these when set.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging on the terminal
/// * `log_file` - Optional path to append debug logs to
///
/// # Examples
/// ```ignore
/// // Quiet terminal, warnings only
/// init(false, None)?;
///
/// // Verbose terminal plus a debug log file
/// init(true, Some(Path::new("fmtgate.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .compact()
        .with_ansi(true)
        .with_filter(env_filter);

    let file_layer = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    // An already installed subscriber stays in place
    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!("Logging already initialized: {e}");
    }

    Ok(())
}
