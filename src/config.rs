//! Configuration constants and runtime settings for Net-Sentinel

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ====== Risk Scoring ======

/// Score every device starts from before penalties are applied
pub const BASE_SCORE: u8 = 100;

/// Penalty per high-tier vulnerability
pub const HIGH_RISK_PENALTY: u8 = 25;

/// Penalty per medium-tier vulnerability (low tier carries none)
pub const MEDIUM_RISK_PENALTY: u8 = 10;

/// Scores at or above this are rendered with the "safe" colour
pub const SAFE_SCORE_MIN: u8 = 80;

/// Scores at or above this (and below `SAFE_SCORE_MIN`) are "warning"; below is "critical"
pub const WARNING_SCORE_MIN: u8 = 50;

// ====== Orbit Layout ======

/// Distance of high-tier nodes from the core (innermost band)
pub const ORBIT_RADIUS_HIGH: f64 = 70.0;

/// Distance of medium-tier nodes from the core
pub const ORBIT_RADIUS_MEDIUM: f64 = 110.0;

/// Distance of low-tier nodes from the core (outermost band)
pub const ORBIT_RADIUS_LOW: f64 = 150.0;

/// Diameters of the concentric guide rings drawn behind the nodes
pub const ORBIT_GUIDE_RINGS: [f64; 3] = [140.0, 220.0, 300.0];

/// Rendered size of a vulnerability node (square, in surface units)
pub const ORBIT_NODE_SIZE: f64 = 44.0;

// ====== Scan Orchestration ======

/// Default scanning collaborator endpoint
pub const DEFAULT_SCAN_ENDPOINT: &str = "http://localhost:3000/ip-send";

/// Default request timeout for the scanning collaborator (deep scans are slow)
pub const DEFAULT_SCAN_TIMEOUT_MS: u64 = 120_000;

/// Delay between the degraded-mode notice and loading the fallback dataset
pub const FALLBACK_DELAY: Duration = Duration::from_millis(1500);

// ====== AI Advisory ======

/// Default narrative-analysis collaborator endpoint
pub const DEFAULT_AI_ENDPOINT: &str = "http://localhost:3000/ai-analyze";

/// Interval between revealed characters of an advisory
pub const TYPEWRITER_INTERVAL: Duration = Duration::from_millis(10);

/// Runtime scan settings (env-driven).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub fallback_delay_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ScanSettings {
    pub fn from_env() -> Self {
        Self {
            endpoint: env_var("NET_SENTINEL_SCAN_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SCAN_ENDPOINT.to_string()),
            timeout_ms: env_parse_u64(
                "NET_SENTINEL_SCAN_TIMEOUT_MS",
                DEFAULT_SCAN_TIMEOUT_MS,
                500,
                600_000,
            ),
            fallback_delay_ms: env_parse_u64(
                "NET_SENTINEL_FALLBACK_DELAY_MS",
                FALLBACK_DELAY.as_millis() as u64,
                0,
                60_000,
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

pub(crate) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_parse_bool(name: &str, default: bool) -> bool {
    match env_var(name) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

pub(crate) fn env_parse_u64(name: &str, default: u64, min: u64, max: u64) -> u64 {
    match env_var(name).and_then(|v| v.parse::<u64>().ok()) {
        Some(v) => v.clamp(min, max),
        None => default,
    }
}
