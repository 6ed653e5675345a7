//! Net-Sentinel CLI
//!
//! Scans a target through the scanning service, scores and lays out the
//! findings, and produces AI advisories, PDF reports and fix scripts.

/// Logs an error message to stderr
macro_rules! log_error {
    ($($arg:tt)*) => {
        net_sentinel::log_error!($($arg)*);
    };
}

#[tokio::main]
async fn main() {
    if let Err(e) = net_sentinel::logging::init_logging() {
        eprintln!("[WARN] Logging disabled: {}", e);
    }

    if let Err(e) = net_sentinel::app::run(std::env::args()).await {
        log_error!("{:#}", e);
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
