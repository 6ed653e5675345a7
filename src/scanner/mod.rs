//! Scanner module - collaborator requests, fallback data and orchestration

mod backend;
mod fallback;
mod orchestrator;

pub use backend::{HttpScanBackend, ScanBackend, ScanFailure, ScanFuture, ScanRequest};
pub use fallback::fallback_devices;
pub use orchestrator::{DEGRADED_SCAN_NOTICE, ScanOrchestrator};
