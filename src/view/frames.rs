//! Render frames handed to the drawing surfaces
//!
//! The controller never draws; it describes what changed and the surface
//! behind the render hook (a browser canvas, a terminal, a test) decides
//! how to show it.

use serde::Serialize;
use std::sync::Arc;

use crate::insights::{DeviceScore, TierDistribution};
use crate::layout::{OrbitScene, TopologyGraph};
use crate::models::{Device, DeviceKind, RiskTier, Vulnerability};

pub type RenderHook = Arc<dyn Fn(&RenderFrame) + Send + Sync>;

/// One entry of the device sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCard {
    pub address: String,
    pub category: String,
    pub kind: DeviceKind,
    pub icon: &'static str,
    pub score: DeviceScore,
    pub active: bool,
}

impl DeviceCard {
    pub fn new(device: &Device, score: DeviceScore, active: bool) -> Self {
        let kind = device.kind();
        Self {
            address: device.address.clone(),
            category: device.category.clone(),
            kind,
            icon: kind.icon(),
            score,
            active,
        }
    }
}

/// Contents of the vulnerability detail panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VulnerabilityDetail {
    pub port: u16,
    pub service: String,
    pub tier: RiskTier,
    pub badge: &'static str,
    pub color: &'static str,
    pub title: String,
    pub description: String,
    pub remediation: String,
}

impl VulnerabilityDetail {
    pub fn new(vulnerability: &Vulnerability) -> Self {
        Self {
            port: vulnerability.port,
            service: vulnerability.service.clone(),
            tier: vulnerability.risk_tier,
            badge: vulnerability.risk_tier.label(),
            color: vulnerability.risk_tier.color(),
            title: format!("Port {} ({})", vulnerability.port, vulnerability.service),
            description: vulnerability.description.clone(),
            remediation: vulnerability.remediation_or_placeholder().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum RenderFrame {
    /// A scan is in flight; scan-dependent controls should ignore input
    Loading { target: String },
    DeviceList { cards: Vec<DeviceCard> },
    Distribution { distribution: TierDistribution },
    /// Active-target banner; `None` when the result is empty
    Target { label: Option<String> },
    /// Orbit surface; `None` renders the empty state
    Orbit { scene: Option<OrbitScene> },
    Topology { graph: TopologyGraph },
    Details { detail: VulnerabilityDetail },
    DetailsHidden,
}

impl RenderFrame {
    pub fn name(&self) -> &'static str {
        match self {
            RenderFrame::Loading { .. } => "loading",
            RenderFrame::DeviceList { .. } => "device_list",
            RenderFrame::Distribution { .. } => "distribution",
            RenderFrame::Target { .. } => "target",
            RenderFrame::Orbit { .. } => "orbit",
            RenderFrame::Topology { .. } => "topology",
            RenderFrame::Details { .. } => "details",
            RenderFrame::DetailsHidden => "details_hidden",
        }
    }
}
