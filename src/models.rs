//! Data models for scan results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown when a finding carries no remediation guidance
pub const REMEDIATION_PLACEHOLDER: &str = "No specific fix data.";

/// Placeholder shown when a device reports no platform
pub const UNKNOWN_PLATFORM: &str = "Unknown OS";

/// Ordinal severity of a finding. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Medium, RiskTier::Low];

    /// Case-insensitive parse; anything outside the three tiers is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }

    /// Display colour used by the orbit nodes, detail badge and topology graph
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::High => "#ff2a6d",
            RiskTier::Medium => "#ffc800",
            RiskTier::Low => "#05d5fa",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding on an open port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub port: u16,
    pub service: String,
    pub risk_tier: RiskTier,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Vulnerability {
    pub fn new(port: u16, service: &str, risk_tier: RiskTier, description: &str) -> Self {
        Self {
            port,
            service: service.to_string(),
            risk_tier,
            description: description.to_string(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    /// Remediation text, or the display placeholder when none was reported
    pub fn remediation_or_placeholder(&self) -> &str {
        self.remediation
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(REMEDIATION_PLACEHOLDER)
    }
}

/// A scanned host and its findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub address: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Device {
    pub fn new(address: &str, category: &str) -> Self {
        Self {
            address: address.to_string(),
            category: category.to_string(),
            platform: None,
            vulnerabilities: Vec::new(),
        }
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    pub fn with_vulnerability(mut self, vulnerability: Vulnerability) -> Self {
        self.vulnerabilities.push(vulnerability);
        self
    }

    pub fn platform_or_unknown(&self) -> &str {
        self.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)
    }

    pub fn kind(&self) -> DeviceKind {
        DeviceKind::from_category(&self.category)
    }

    pub fn has_high_risk(&self) -> bool {
        self.vulnerabilities
            .iter()
            .any(|v| v.risk_tier == RiskTier::High)
    }

    /// Label used for the active-target banner, e.g. `10.0.0.5 [Ubuntu 20.04]`
    pub fn target_label(&self) -> String {
        format!("{} [{}]", self.address, self.platform_or_unknown())
    }
}

/// Icon/shape family derived from the free-form category label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Server,
    Gateway,
    Workstation,
}

impl DeviceKind {
    pub fn from_category(category: &str) -> Self {
        let lower = category.to_ascii_lowercase();
        if lower.contains("server") {
            DeviceKind::Server
        } else if lower.contains("gateway") || lower.contains("router") {
            DeviceKind::Gateway
        } else {
            DeviceKind::Workstation
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DeviceKind::Server => "server",
            DeviceKind::Gateway => "wifi",
            DeviceKind::Workstation => "desktop",
        }
    }
}

/// Where the devices of a scan result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    Live,
    Fallback,
}

/// Devices produced by one completed scan (live or simulated)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub target: String,
    pub source: ScanSource,
    pub devices: Vec<Device>,
}

impl ScanResult {
    pub fn is_degraded(&self) -> bool {
        self.source == ScanSource::Fallback
    }

    pub fn device(&self, address: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.address == address)
    }
}
