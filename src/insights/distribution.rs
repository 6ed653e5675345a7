//! Risk tier distribution across a scan result
//!
//! Feeds the high/medium/low doughnut shown next to the device list.

use serde::{Deserialize, Serialize};

use crate::models::{Device, RiskTier};

/// Finding counts per tier across every device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierDistribution {
    pub fn calculate(devices: &[Device]) -> Self {
        devices
            .iter()
            .flat_map(|d| d.vulnerabilities.iter())
            .fold(Self::default(), |mut acc, v| {
                match v.risk_tier {
                    RiskTier::High => acc.high += 1,
                    RiskTier::Medium => acc.medium += 1,
                    RiskTier::Low => acc.low += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Medium => self.medium,
            RiskTier::Low => self.low,
        }
    }
}
