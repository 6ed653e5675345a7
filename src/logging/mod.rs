//! Structured logging for Net-Sentinel
//!
//! Human-readable lines go to stderr so stdout stays reserved for command
//! output; a JSON copy of every event lands in a daily-rotated file.

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const APP_DIR: &str = "net-sentinel";
const LOG_FILE_PREFIX: &str = "net-sentinel.log";
const LOG_DIR_ENV: &str = "NET_SENTINEL_LOG_DIR";
const DEFAULT_DIRECTIVE: &str = "info";

type LogResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Install the console and file layers and return the log directory.
///
/// Level comes from `RUST_LOG` (default `info`). `RUST_LOG=debug` adds
/// discarded scan tickets and ignored selections.
pub fn init_logging() -> LogResult<PathBuf> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let file_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            &log_dir,
            LOG_FILE_PREFIX,
        ))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .json();

    let installed = tracing_subscriber::registry()
        .with(env_filter()?)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match installed {
        Ok(()) => {
            tracing::info!("Logging to {}", log_dir.display());
            Ok(log_dir)
        }
        // Test harnesses and embedding hosts may own the global subscriber
        Err(e) if e.to_string().contains("already been set") => Ok(log_dir),
        Err(e) => Err(Box::new(e)),
    }
}

fn env_filter() -> LogResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(DEFAULT_DIRECTIVE)?),
    }
}

/// `$NET_SENTINEL_LOG_DIR` when set, else `<config dir>/net-sentinel/logs`
pub fn get_log_directory() -> LogResult<PathBuf> {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let config_dir = dirs::config_dir().ok_or("Could not find a config directory")?;
    Ok(config_dir.join(APP_DIR).join("logs"))
}

/// Path of today's log file
pub fn get_current_log_file() -> LogResult<PathBuf> {
    let today = chrono::Local::now().format("%Y-%m-%d");
    Ok(get_log_directory()?.join(format!("{}.{}", LOG_FILE_PREFIX, today)))
}
