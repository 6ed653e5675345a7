//! JSON export functionality
//!
//! Export the current session (devices with their scores) to JSON

use anyhow::Result;
use serde::Serialize;

use crate::insights::{DeviceScore, RiskPenalties, ScoreBands, TierDistribution};
use crate::models::{Device, ScanResult, ScanSource, Vulnerability};

/// Session export format
#[derive(Debug, Serialize)]
pub struct SessionExport<'a> {
    pub export_date: String,
    pub target: &'a str,
    pub source: ScanSource,
    pub total_devices: usize,
    pub distribution: TierDistribution,
    pub devices: Vec<DeviceExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DeviceExport<'a> {
    pub address: &'a str,
    pub category: &'a str,
    pub platform: &'a str,
    pub score: u8,
    pub band: &'static str,
    pub vulnerabilities: &'a [Vulnerability],
}

impl<'a> DeviceExport<'a> {
    fn new(device: &'a Device, score: DeviceScore) -> Self {
        Self {
            address: &device.address,
            category: &device.category,
            platform: device.platform_or_unknown(),
            score: score.score,
            band: score.band.as_str(),
            vulnerabilities: &device.vulnerabilities,
        }
    }
}

/// Export a scan result with per-device scores to pretty JSON
pub fn export_session_json(
    scan: &ScanResult,
    penalties: &RiskPenalties,
    bands: &ScoreBands,
) -> Result<String> {
    let devices: Vec<DeviceExport<'_>> = scan
        .devices
        .iter()
        .map(|d| DeviceExport::new(d, DeviceScore::calculate(d, penalties, bands)))
        .collect();

    let export = SessionExport {
        export_date: chrono::Utc::now().to_rfc3339(),
        target: &scan.target,
        source: scan.source,
        total_devices: devices.len(),
        distribution: TierDistribution::calculate(&scan.devices),
        devices,
    };

    let json = serde_json::to_string_pretty(&export)?;
    Ok(json)
}
