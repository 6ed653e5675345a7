//! View state machine
//!
//! States are `{Orbit, Topology} x {NoSelection, Selected(address)}`.
//! Every mutation goes through a transition below, and each transition
//! reports what to redraw through the render hook.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::insights::{DeviceScore, RiskPenalties, ScoreBands, TierDistribution};
use crate::layout::{OrbitBands, OrbitScene, TopologyGraph};
use crate::models::{Device, ScanResult, ScanSource, Vulnerability};
use crate::view::frames::{DeviceCard, RenderFrame, RenderHook, VulnerabilityDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Orbit,
    Topology,
}

impl ViewMode {
    pub fn flipped(self) -> Self {
        match self {
            ViewMode::Orbit => ViewMode::Topology,
            ViewMode::Topology => ViewMode::Orbit,
        }
    }
}

/// Identifies one scan request; only the newest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanTicket(u64);

impl ScanTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub struct ViewStateController {
    devices: Vec<Device>,
    selected: Option<String>,
    inspected: Option<Vulnerability>,
    mode: ViewMode,
    source: Option<ScanSource>,
    latest_ticket: u64,
    topology: Option<TopologyGraph>,
    penalties: RiskPenalties,
    bands: ScoreBands,
    orbit_bands: OrbitBands,
    render: RenderHook,
}

impl Default for ViewStateController {
    fn default() -> Self {
        Self::new(Arc::new(|_| {}))
    }
}

impl ViewStateController {
    /// Orbit mode, no selection, empty device list.
    pub fn new(render: RenderHook) -> Self {
        Self {
            devices: Vec::new(),
            selected: None,
            inspected: None,
            mode: ViewMode::Orbit,
            source: None,
            latest_ticket: 0,
            topology: None,
            penalties: RiskPenalties::default(),
            bands: ScoreBands::default(),
            orbit_bands: OrbitBands::default(),
            render,
        }
    }

    pub fn with_scoring(mut self, penalties: RiskPenalties, bands: ScoreBands) -> Self {
        self.penalties = penalties;
        self.bands = bands;
        self
    }

    pub fn with_orbit_bands(mut self, orbit_bands: OrbitBands) -> Self {
        self.orbit_bands = orbit_bands;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn source(&self) -> Option<ScanSource> {
        self.source
    }

    pub fn penalties(&self) -> &RiskPenalties {
        &self.penalties
    }

    pub fn bands(&self) -> &ScoreBands {
        &self.bands
    }

    pub fn selected_address(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_device(&self) -> Option<&Device> {
        let address = self.selected.as_deref()?;
        self.devices.iter().find(|d| d.address == address)
    }

    pub fn inspected_vulnerability(&self) -> Option<&Vulnerability> {
        self.inspected.as_ref()
    }

    pub fn score(&self, device: &Device) -> DeviceScore {
        DeviceScore::calculate(device, &self.penalties, &self.bands)
    }

    /// Issue a ticket for a new scan and show the loading state.
    pub fn begin_scan(&mut self, target: &str) -> ScanTicket {
        self.latest_ticket += 1;
        self.emit(RenderFrame::Loading {
            target: target.to_string(),
        });
        ScanTicket(self.latest_ticket)
    }

    /// Apply a finished scan if no newer scan was started since `ticket`.
    pub fn complete_scan(&mut self, ticket: ScanTicket, result: ScanResult) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "Discarding result of scan #{} for {}; scan #{} is newer",
                ticket.0,
                result.target,
                self.latest_ticket
            );
            return false;
        }
        self.new_scan_result(result);
        true
    }

    /// Replace the device list wholesale and redraw the active view.
    pub fn new_scan_result(&mut self, result: ScanResult) {
        self.devices = result.devices;
        self.source = Some(result.source);
        self.selected = self.devices.first().map(|d| d.address.clone());
        self.inspected = None;
        self.topology = None;

        self.emit_device_list();
        self.emit(RenderFrame::Distribution {
            distribution: TierDistribution::calculate(&self.devices),
        });
        self.emit_target();

        match self.mode {
            ViewMode::Orbit => self.emit_orbit(),
            ViewMode::Topology => self.rebuild_topology(),
        }
    }

    /// Select a device by address. Unknown addresses are a no-op.
    pub fn select_device(&mut self, address: &str) -> bool {
        if !self.devices.iter().any(|d| d.address == address) {
            tracing::debug!("Ignoring selection of unknown device {}", address);
            return false;
        }

        self.selected = Some(address.to_string());
        self.inspected = None;
        self.emit_device_list();
        self.emit_target();

        // In topology mode the graph surface already highlights the clicked node
        if self.mode == ViewMode::Orbit {
            self.emit_orbit();
        }
        true
    }

    /// Selection reported by the topology surface's node-click.
    pub fn select_topology_node(&mut self, node_id: usize) -> bool {
        let address = self
            .topology
            .as_ref()
            .and_then(|graph| graph.node_address(node_id))
            .map(str::to_string);

        match address {
            Some(address) => self.select_device(&address),
            None => false,
        }
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.mode = self.mode.flipped();
        match self.mode {
            ViewMode::Topology => self.rebuild_topology(),
            ViewMode::Orbit => self.emit_orbit(),
        }
        self.mode
    }

    /// Switch to `mode` if not already there.
    pub fn show(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.toggle_view();
        true
    }

    /// Open the detail panel for the selected device's finding on `port`.
    pub fn inspect_vulnerability(&mut self, port: u16) -> Option<VulnerabilityDetail> {
        let vulnerability = self
            .selected_device()?
            .vulnerabilities
            .iter()
            .find(|v| v.port == port)?
            .clone();

        let detail = VulnerabilityDetail::new(&vulnerability);
        self.inspected = Some(vulnerability);
        self.emit(RenderFrame::Details {
            detail: detail.clone(),
        });
        Some(detail)
    }

    pub fn close_details(&mut self) {
        self.emit(RenderFrame::DetailsHidden);
    }

    /// Frame of whichever view is active, without emitting it.
    pub fn active_frame(&self) -> RenderFrame {
        match self.mode {
            ViewMode::Orbit => RenderFrame::Orbit {
                scene: self.orbit_scene(),
            },
            ViewMode::Topology => RenderFrame::Topology {
                graph: self
                    .topology
                    .clone()
                    .unwrap_or_else(|| TopologyGraph::build(&self.devices)),
            },
        }
    }

    fn orbit_scene(&self) -> Option<OrbitScene> {
        self.selected_device()
            .map(|device| OrbitScene::build(device, &self.orbit_bands))
    }

    fn rebuild_topology(&mut self) {
        let graph = TopologyGraph::build(&self.devices);
        self.emit(RenderFrame::Topology {
            graph: graph.clone(),
        });
        self.topology = Some(graph);
    }

    fn emit_orbit(&self) {
        self.emit(RenderFrame::Orbit {
            scene: self.orbit_scene(),
        });
    }

    fn emit_target(&self) {
        self.emit(RenderFrame::Target {
            label: self.selected_device().map(Device::target_label),
        });
    }

    fn emit_device_list(&self) {
        let selected = self.selected.as_deref();
        let cards = self
            .devices
            .iter()
            .map(|d| DeviceCard::new(d, self.score(d), Some(d.address.as_str()) == selected))
            .collect();
        self.emit(RenderFrame::DeviceList { cards });
    }

    fn emit(&self, frame: RenderFrame) {
        (self.render)(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::scanner::fallback_devices;
    use std::sync::Mutex;

    fn recording_controller() -> (ViewStateController, Arc<Mutex<Vec<RenderFrame>>>) {
        let frames: Arc<Mutex<Vec<RenderFrame>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        let controller = ViewStateController::new(Arc::new(move |frame| {
            sink.lock()
                .expect("frame lock should not be poisoned")
                .push(frame.clone());
        }));
        (controller, frames)
    }

    fn live(devices: Vec<Device>) -> ScanResult {
        ScanResult {
            target: "192.168.1.0/24".to_string(),
            source: ScanSource::Live,
            devices,
        }
    }

    fn drain(frames: &Arc<Mutex<Vec<RenderFrame>>>) -> Vec<RenderFrame> {
        std::mem::take(&mut *frames.lock().expect("frame lock should not be poisoned"))
    }

    #[test]
    fn starts_in_orbit_without_selection() {
        let controller = ViewStateController::default();
        assert_eq!(controller.mode(), ViewMode::Orbit);
        assert!(controller.selected_device().is_none());
        assert!(controller.devices().is_empty());
    }

    #[test]
    fn new_result_selects_first_device_and_renders_orbit() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));

        assert_eq!(controller.selected_address(), Some("192.168.1.15"));
        let rendered = drain(&frames);
        let names: Vec<&str> = rendered.iter().map(RenderFrame::name).collect();
        assert_eq!(names, vec!["device_list", "distribution", "target", "orbit"]);

        match rendered.last() {
            Some(RenderFrame::Orbit { scene: Some(scene) }) => {
                assert_eq!(scene.core_address, "192.168.1.15");
                assert_eq!(scene.nodes[0].vulnerability.risk_tier, RiskTier::High);
            }
            other => panic!("expected orbit scene, got {:?}", other),
        }
    }

    #[test]
    fn empty_result_clears_selection() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        controller.new_scan_result(live(Vec::new()));

        assert!(controller.selected_device().is_none());
        assert!(matches!(
            drain(&frames).last(),
            Some(RenderFrame::Orbit { scene: None })
        ));
    }

    #[test]
    fn toggling_twice_restores_mode_and_selection() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        controller.select_device("192.168.1.1");
        drain(&frames);

        assert_eq!(controller.toggle_view(), ViewMode::Topology);
        assert_eq!(controller.toggle_view(), ViewMode::Orbit);
        assert_eq!(controller.selected_address(), Some("192.168.1.1"));

        let rendered = drain(&frames);
        assert!(matches!(rendered[0], RenderFrame::Topology { ref graph } if graph.nodes.len() == 4));
        assert!(matches!(
            rendered[1],
            RenderFrame::Orbit { scene: Some(ref scene) } if scene.core_address == "192.168.1.1"
        ));
    }

    #[test]
    fn selection_in_topology_mode_skips_orbit_layout() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        controller.toggle_view();
        drain(&frames);

        assert!(controller.select_topology_node(2));
        assert_eq!(controller.selected_address(), Some("192.168.1.100"));
        assert!(
            !drain(&frames)
                .iter()
                .any(|f| matches!(f, RenderFrame::Orbit { .. }))
        );

        assert!(!controller.select_topology_node(0), "root is not a device");
    }

    #[test]
    fn new_result_in_topology_mode_rebuilds_graph() {
        let (mut controller, frames) = recording_controller();
        controller.toggle_view();
        drain(&frames);
        controller.new_scan_result(live(fallback_devices()));
        assert!(matches!(
            drain(&frames).last(),
            Some(RenderFrame::Topology { .. })
        ));
    }

    #[test]
    fn unknown_selection_is_a_no_op() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        drain(&frames);

        assert!(!controller.select_device("10.9.9.9"));
        assert_eq!(controller.selected_address(), Some("192.168.1.15"));
        assert!(drain(&frames).is_empty());
    }

    #[test]
    fn stale_scan_tickets_are_discarded() {
        let (mut controller, _frames) = recording_controller();
        let first = controller.begin_scan("10.0.0.0/24");
        let second = controller.begin_scan("10.0.1.0/24");

        let newer = vec![Device::new("10.0.1.7", "Workstation")];
        assert!(controller.complete_scan(second, live(newer)));
        assert!(!controller.complete_scan(first, live(fallback_devices())));
        assert_eq!(controller.selected_address(), Some("10.0.1.7"));
        assert_eq!(controller.devices().len(), 1);
    }

    #[test]
    fn inspect_tracks_finding_until_device_changes() {
        let (mut controller, _frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));

        let detail = controller.inspect_vulnerability(80).expect("port 80 finding");
        assert_eq!(detail.remediation, "Enable HTTPS (Certbot).");
        assert_eq!(controller.inspected_vulnerability().map(|v| v.port), Some(80));
        assert!(controller.inspect_vulnerability(9999).is_none());

        controller.select_device("192.168.1.1");
        assert!(controller.inspected_vulnerability().is_none());
    }

    #[test]
    fn active_frame_follows_mode() {
        let (mut controller, _frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        assert_eq!(controller.active_frame().name(), "orbit");
        controller.toggle_view();
        assert!(matches!(
            controller.active_frame(),
            RenderFrame::Topology { ref graph } if graph.edges.len() == 3
        ));
    }

    #[test]
    fn show_only_toggles_when_mode_differs() {
        let (mut controller, _frames) = recording_controller();
        assert!(!controller.show(ViewMode::Orbit));
        assert!(controller.show(ViewMode::Topology));
        assert_eq!(controller.mode(), ViewMode::Topology);
    }

    #[test]
    fn device_cards_mark_active_device_with_scores() {
        let (mut controller, frames) = recording_controller();
        controller.new_scan_result(live(fallback_devices()));
        let rendered = drain(&frames);
        let Some(RenderFrame::DeviceList { cards }) = rendered.first() else {
            panic!("expected device list first");
        };
        assert!(cards[0].active);
        assert!(!cards[1].active);
        assert_eq!(cards[0].score.score, 65);
        assert_eq!(cards[1].score.score, 100);
        assert_eq!(cards[2].icon, "wifi");
    }

    #[test]
    fn custom_orbit_bands_drive_layout() {
        let bands = OrbitBands::new(40.0, 80.0, 120.0).expect("ordered bands");
        let (controller, _frames) = recording_controller();
        let mut controller = controller.with_orbit_bands(bands);
        controller.new_scan_result(live(fallback_devices()));

        let RenderFrame::Orbit { scene: Some(scene) } = controller.active_frame() else {
            panic!("expected an orbit scene");
        };
        let radii: Vec<f64> = scene.nodes.iter().map(|n| n.radius).collect();
        assert_eq!(radii, vec![40.0, 80.0, 120.0]);
    }
}
