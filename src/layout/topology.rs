//! Topology graph
//!
//! One synthetic internet/gateway root fanning out to every device. Node
//! physics and drawing belong to the graph surface; this only builds the
//! node/edge lists.

use serde::{Deserialize, Serialize};

use crate::models::{Device, DeviceKind};

pub const ROOT_NODE_ID: usize = 0;
pub const ROOT_LABEL: &str = "Internet";

const ROOT_COLOR: &str = "#ffffff";
const HIGH_RISK_COLOR: &str = "#ff2a6d";
const NORMAL_COLOR: &str = "#05d5fa";
const EDGE_COLOR: &str = "rgba(255,255,255,0.2)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Dot,
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: usize,
    pub label: String,
    pub color: String,
    pub shape: NodeShape,
    /// Device address; `None` for the root
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub from: usize,
    pub to: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
}

impl TopologyGraph {
    /// Build the star graph for the full device list, in device order.
    pub fn build(devices: &[Device]) -> Self {
        let mut nodes = Vec::with_capacity(devices.len() + 1);
        let mut edges = Vec::with_capacity(devices.len());

        nodes.push(TopologyNode {
            id: ROOT_NODE_ID,
            label: ROOT_LABEL.to_string(),
            color: ROOT_COLOR.to_string(),
            shape: NodeShape::Dot,
            address: None,
        });

        for (idx, device) in devices.iter().enumerate() {
            let id = idx + 1;
            let color = if device.has_high_risk() {
                HIGH_RISK_COLOR
            } else {
                NORMAL_COLOR
            };
            let shape = match device.kind() {
                DeviceKind::Gateway => NodeShape::Diamond,
                _ => NodeShape::Dot,
            };

            nodes.push(TopologyNode {
                id,
                label: format!("{}\n{}", device.category, device.address),
                color: color.to_string(),
                shape,
                address: Some(device.address.clone()),
            });
            edges.push(TopologyEdge {
                from: ROOT_NODE_ID,
                to: id,
                color: EDGE_COLOR.to_string(),
            });
        }

        Self { nodes, edges }
    }

    /// Address of the device behind a clicked node; the root maps to none.
    pub fn node_address(&self, node_id: usize) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .and_then(|n| n.address.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, Vulnerability};

    fn sample_devices() -> Vec<Device> {
        vec![
            Device::new("192.168.1.15", "Linux Server").with_vulnerability(Vulnerability::new(
                3306,
                "MySQL",
                RiskTier::High,
                "root access",
            )),
            Device::new("192.168.1.100", "Workstation"),
            Device::new("192.168.1.1", "Gateway"),
        ]
    }

    #[test]
    fn root_fans_out_to_every_device() {
        let graph = TopologyGraph::build(&sample_devices());
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.iter().all(|e| e.from == ROOT_NODE_ID));
        let targets: Vec<usize> = graph.edges.iter().map(|e| e.to).collect();
        assert_eq!(targets, vec![1, 2, 3]);
        assert_eq!(graph.nodes[0].label, ROOT_LABEL);
    }

    #[test]
    fn node_style_reflects_risk_and_kind() {
        let graph = TopologyGraph::build(&sample_devices());
        assert_eq!(graph.nodes[1].color, HIGH_RISK_COLOR);
        assert_eq!(graph.nodes[2].color, NORMAL_COLOR);
        assert_eq!(graph.nodes[3].shape, NodeShape::Diamond);
        assert_eq!(graph.nodes[1].label, "Linux Server\n192.168.1.15");
    }

    #[test]
    fn node_clicks_resolve_to_addresses() {
        let graph = TopologyGraph::build(&sample_devices());
        assert_eq!(graph.node_address(ROOT_NODE_ID), None);
        assert_eq!(graph.node_address(2), Some("192.168.1.100"));
        assert_eq!(graph.node_address(99), None);
    }

    #[test]
    fn empty_device_list_keeps_only_root() {
        let graph = TopologyGraph::build(&[]);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }
}
