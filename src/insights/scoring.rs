//! Per-device risk scoring and display banding
//!
//! Score Scale (higher = safer):
//! - starts at 100
//! - each high-tier finding subtracts `RiskPenalties::high`
//! - each medium-tier finding subtracts `RiskPenalties::medium`
//! - low-tier findings are informational and cost nothing
//! - floor at 0

use serde::{Deserialize, Serialize};

use crate::config::{
    BASE_SCORE, HIGH_RISK_PENALTY, MEDIUM_RISK_PENALTY, SAFE_SCORE_MIN, WARNING_SCORE_MIN,
};
use crate::models::{Device, RiskTier};

/// Fixed per-tier penalties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPenalties {
    pub high: u8,
    pub medium: u8,
}

impl Default for RiskPenalties {
    fn default() -> Self {
        Self {
            high: HIGH_RISK_PENALTY,
            medium: MEDIUM_RISK_PENALTY,
        }
    }
}

impl RiskPenalties {
    fn penalty(&self, tier: RiskTier) -> u32 {
        match tier {
            RiskTier::High => u32::from(self.high),
            RiskTier::Medium => u32::from(self.medium),
            RiskTier::Low => 0,
        }
    }
}

/// Display band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Safe,
    Warning,
    Critical,
}

impl ScoreBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Safe => "safe",
            ScoreBand::Warning => "warning",
            ScoreBand::Critical => "critical",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Safe => "#05d5fa",
            ScoreBand::Warning => "#ffc800",
            ScoreBand::Critical => "#ff2a6d",
        }
    }
}

/// Band thresholds, independent of the penalty formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBands {
    pub safe_min: u8,
    pub warning_min: u8,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            safe_min: SAFE_SCORE_MIN,
            warning_min: WARNING_SCORE_MIN,
        }
    }
}

impl ScoreBands {
    pub fn classify(&self, score: u8) -> ScoreBand {
        if score >= self.safe_min {
            ScoreBand::Safe
        } else if score >= self.warning_min {
            ScoreBand::Warning
        } else {
            ScoreBand::Critical
        }
    }
}

/// Score for a device, clamped to `0..=100`
pub fn score_device(device: &Device, penalties: &RiskPenalties) -> u8 {
    let total_penalty: u32 = device
        .vulnerabilities
        .iter()
        .map(|v| penalties.penalty(v.risk_tier))
        .sum();

    u32::from(BASE_SCORE).saturating_sub(total_penalty) as u8
}

/// Score and band together, as shown next to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceScore {
    pub score: u8,
    pub band: ScoreBand,
}

impl DeviceScore {
    pub fn calculate(device: &Device, penalties: &RiskPenalties, bands: &ScoreBands) -> Self {
        let score = score_device(device, penalties);
        Self {
            score,
            band: bands.classify(score),
        }
    }
}
