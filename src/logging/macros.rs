//! Logging macros shared by the library and the binary
//!
//! Thin wrappers over `tracing` so call sites read like the console log
//! they end up in.

/// Informational progress line
#[macro_export]
macro_rules! log_stderr {
    ($($arg:tt)*) => {
        tracing::info!("{}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!("{}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!("{}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("{}", format!($($arg)*))
    };
}
