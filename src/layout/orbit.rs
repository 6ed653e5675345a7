//! Orbit layout
//!
//! Places a device at the origin and its findings on concentric bands
//! keyed by tier. High-tier findings sit on the innermost band.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::{
    ORBIT_GUIDE_RINGS, ORBIT_NODE_SIZE, ORBIT_RADIUS_HIGH, ORBIT_RADIUS_LOW, ORBIT_RADIUS_MEDIUM,
};
use crate::models::{Device, RiskTier, Vulnerability};

/// Radius of each tier band. Invariant: `0 < high < medium < low`,
/// enforced by [`OrbitBands::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitBands {
    high: f64,
    medium: f64,
    low: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("orbit bands must satisfy 0 < high < medium < low (got {high}, {medium}, {low})")]
pub struct InvalidOrbitBands {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for OrbitBands {
    fn default() -> Self {
        Self {
            high: ORBIT_RADIUS_HIGH,
            medium: ORBIT_RADIUS_MEDIUM,
            low: ORBIT_RADIUS_LOW,
        }
    }
}

impl OrbitBands {
    pub fn new(high: f64, medium: f64, low: f64) -> Result<Self, InvalidOrbitBands> {
        // written so NaN fails every comparison
        if 0.0 < high && high < medium && medium < low && low.is_finite() {
            Ok(Self { high, medium, low })
        } else {
            Err(InvalidOrbitBands { high, medium, low })
        }
    }

    pub fn radius(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Medium => self.medium,
            RiskTier::Low => self.low,
        }
    }
}

/// A finding placed around the core, relative to the shared centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitNode {
    pub vulnerability: Vulnerability,
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

impl OrbitNode {
    /// Top-left corner on a surface whose centre is `(center_x, center_y)`
    pub fn surface_origin(&self, center_x: f64, center_y: f64) -> (f64, f64) {
        let half = ORBIT_NODE_SIZE / 2.0;
        (center_x + self.x - half, center_y + self.y - half)
    }
}

/// Findings ordered high → medium → low, input order kept within a tier.
pub fn sort_by_severity(vulnerabilities: &[Vulnerability]) -> Vec<&Vulnerability> {
    let mut sorted: Vec<&Vulnerability> = vulnerabilities.iter().collect();
    // sort_by is stable, so equal tiers keep their input order
    sorted.sort_by(|a, b| b.risk_tier.cmp(&a.risk_tier));
    sorted
}

/// Place a device's findings on the orbit bands.
pub fn layout(device: &Device, bands: &OrbitBands) -> Vec<OrbitNode> {
    let sorted = sort_by_severity(&device.vulnerabilities);
    let n = sorted.len();
    if n == 0 {
        return Vec::new();
    }

    let step = TAU / n as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, vulnerability)| {
            let angle = i as f64 * step;
            let radius = bands.radius(vulnerability.risk_tier);
            OrbitNode {
                vulnerability: vulnerability.clone(),
                angle,
                radius,
                x: angle.cos() * radius,
                y: angle.sin() * radius,
            }
        })
        .collect()
}

/// Everything the orbit surface needs for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitScene {
    pub core_address: String,
    pub core_kind: crate::models::DeviceKind,
    pub guide_rings: Vec<f64>,
    pub nodes: Vec<OrbitNode>,
}

impl OrbitScene {
    pub fn build(device: &Device, bands: &OrbitBands) -> Self {
        Self {
            core_address: device.address.clone(),
            core_kind: device.kind(),
            guide_rings: ORBIT_GUIDE_RINGS.to_vec(),
            nodes: layout(device, bands),
        }
    }
}
