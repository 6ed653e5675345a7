//! Scan orchestration with delay-then-fallback recovery
//!
//! Any failure (bad status, transport error, empty or unparseable body)
//! produces exactly one degraded-mode notice, a short pause, and the
//! built-in fallback dataset. There is no retry against the real backend.

use std::time::Duration;

use crate::app::{AppContext, AppEvent};
use crate::config::ScanSettings;
use crate::models::{ScanResult, ScanSource};
use crate::scanner::backend::{HttpScanBackend, ScanBackend, ScanRequest};
use crate::scanner::fallback::fallback_devices;

/// User-visible notice emitted when simulated data replaces a real scan
pub const DEGRADED_SCAN_NOTICE: &str = "Server Offline. Loading Simulation Data...";

pub struct ScanOrchestrator {
    backend: Box<dyn ScanBackend>,
    fallback_delay: Duration,
}

impl ScanOrchestrator {
    pub fn new(backend: Box<dyn ScanBackend>, fallback_delay: Duration) -> Self {
        Self {
            backend,
            fallback_delay,
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> anyhow::Result<Self> {
        let backend = HttpScanBackend::from_settings(settings)?;
        Ok(Self::new(Box::new(backend), settings.fallback_delay()))
    }

    pub fn backend_id(&self) -> &'static str {
        self.backend.backend_id()
    }

    /// Run one scan. Never fails: a broken backend degrades to the fallback dataset.
    pub async fn scan(&self, request: &ScanRequest, context: &AppContext) -> ScanResult {
        crate::log_stderr!(
            "Requesting {} scan of {} via {} backend",
            if request.deep_scan { "deep" } else { "quick" },
            request.address,
            self.backend.backend_id()
        );

        match self.backend.request_scan(request).await {
            Ok(devices) => {
                crate::log_stderr!("Scan of {} returned {} devices", request.address, devices.len());
                ScanResult {
                    target: request.address.clone(),
                    source: ScanSource::Live,
                    devices,
                }
            }
            Err(failure) => {
                crate::log_warn!("Scan of {} failed: {}", request.address, failure);
                context.emit_event(AppEvent::Degraded {
                    component: "scan".to_string(),
                    message: format!("{} ({})", DEGRADED_SCAN_NOTICE, failure),
                });

                tokio::time::sleep(self.fallback_delay).await;

                ScanResult {
                    target: request.address.clone(),
                    source: ScanSource::Fallback,
                    devices: fallback_devices(),
                }
            }
        }
    }
}
