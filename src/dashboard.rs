//! Dashboard session
//!
//! Owns the session state (current scan result, selection, view mode and the
//! advisory surface) and wires the scanner, the view controller, the advisor
//! and the typewriter together over one `AppContext`.

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::ai::{Advisor, Advisory, DisplaySurface, Typewriter};
use crate::app::{AppContext, AppEvent};
use crate::command::{VoiceAction, interpret_transcript};
use crate::exports::{RemediationScript, generate_script, render_report_pdf};
use crate::models::{Device, ScanResult};
use crate::scanner::{ScanOrchestrator, ScanRequest};
use crate::view::{ScanTicket, ViewMode, ViewStateController, VulnerabilityDetail};

/// A scan that has been issued a ticket but whose result is not applied yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScan {
    pub ticket: ScanTicket,
    pub request: ScanRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoiceOutcome {
    Scanned { target: String, devices: usize },
    ViewChanged { mode: ViewMode },
    ViewUnchanged { mode: ViewMode },
    ReportExported {
        #[serde(skip)]
        pdf: Vec<u8>,
        bytes: usize,
    },
    Unrecognized,
}

pub struct Dashboard {
    context: AppContext,
    scanner: ScanOrchestrator,
    advisor: Advisor,
    controller: ViewStateController,
    typewriter: Typewriter,
    target: Option<String>,
}

impl Dashboard {
    /// Build a dashboard with the HTTP scanner and the advisor configured by `context`.
    pub fn new(context: &AppContext) -> Result<Self> {
        let scanner = ScanOrchestrator::from_settings(context.scan_settings())?;
        let advisor = Advisor::from_settings(context.ai_settings());
        Ok(Self::with_parts(context, scanner, advisor))
    }

    pub fn with_parts(context: &AppContext, scanner: ScanOrchestrator, advisor: Advisor) -> Self {
        let surface = DisplaySurface::new().with_hook(context.surface_hook());
        Self {
            context: context.clone(),
            scanner,
            advisor,
            controller: ViewStateController::new(context.render_hook()),
            typewriter: Typewriter::new(surface, context.ai_settings().typewriter_interval()),
            target: None,
        }
    }

    pub fn controller(&self) -> &ViewStateController {
        &self.controller
    }

    pub fn scanner(&self) -> &ScanOrchestrator {
        &self.scanner
    }

    pub fn surface(&self) -> &DisplaySurface {
        self.typewriter.surface()
    }

    pub fn typewriter_mut(&mut self) -> &mut Typewriter {
        &mut self.typewriter
    }

    /// Target of the most recent scan request
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Target reused by a voice "scan" that names no address
    pub fn remember_target(&mut self, target: &str) {
        self.target = Some(target.to_string());
    }

    /// Issue a ticket for a scan of `target` and show the loading state.
    pub fn begin_scan(&mut self, target: &str, deep_scan: bool) -> PendingScan {
        let ticket = self.controller.begin_scan(target);
        self.target = Some(target.to_string());
        self.context.emit_event(AppEvent::ScanStarted {
            ticket: ticket.id(),
            target: target.to_string(),
        });
        PendingScan {
            ticket,
            request: ScanRequest::new(target, deep_scan),
        }
    }

    /// Apply a finished scan unless a newer one was issued meanwhile.
    pub fn complete_scan(&mut self, pending: PendingScan, result: ScanResult) -> bool {
        let ticket = pending.ticket.id();
        let devices = result.devices.len();
        let source = result.source;

        if self.controller.complete_scan(pending.ticket, result) {
            self.context.emit_event(AppEvent::ScanApplied {
                ticket,
                devices,
                source,
            });
            true
        } else {
            self.context.emit_event(AppEvent::ScanDiscarded { ticket });
            false
        }
    }

    /// Scan `target` and apply the result. Never fails; see [`ScanOrchestrator::scan`].
    pub async fn run_scan(&mut self, target: &str, deep_scan: bool) -> ScanResult {
        let pending = self.begin_scan(target, deep_scan);
        let result = self.scanner.scan(&pending.request, &self.context).await;
        self.complete_scan(pending, result.clone());
        result
    }

    pub fn select_device(&mut self, address: &str) -> bool {
        self.controller.select_device(address)
    }

    pub fn select_topology_node(&mut self, node_id: usize) -> bool {
        self.controller.select_topology_node(node_id)
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.controller.toggle_view()
    }

    pub fn show(&mut self, mode: ViewMode) -> bool {
        self.controller.show(mode)
    }

    pub fn inspect_vulnerability(&mut self, port: u16) -> Option<VulnerabilityDetail> {
        self.controller.inspect_vulnerability(port)
    }

    pub fn close_details(&mut self) {
        self.controller.close_details();
    }

    /// Analyze the selected device and start revealing the advisory text.
    ///
    /// Returns `None` (after a prompt) when nothing is selected.
    pub async fn analyze_selected(&mut self) -> Option<Advisory> {
        let Some(device) = self.controller.selected_device().cloned() else {
            self.context.emit_event(AppEvent::Warn {
                message: "Select a target first.".to_string(),
            });
            return None;
        };

        Some(self.analyze_device(&device).await)
    }

    async fn analyze_device(&mut self, device: &Device) -> Advisory {
        let advisory = self.advisor.analyze(device).await;

        if advisory.is_degraded() {
            self.context.emit_event(AppEvent::Degraded {
                component: "ai".to_string(),
                message: format!(
                    "AI Analyst unavailable, showing local diagnostic ({})",
                    advisory.ai_error.as_deref().unwrap_or("unknown error")
                ),
            });
        }

        self.typewriter.start(&advisory.text);
        advisory
    }

    /// PDF report over the current device list
    pub fn export_report(&self) -> Result<Vec<u8>> {
        render_report_pdf(
            self.controller.devices(),
            self.controller.penalties(),
            self.controller.bands(),
        )
    }

    /// Script for the finding open in the detail panel
    pub fn remediation_script(&self) -> Option<RemediationScript> {
        self.controller
            .inspected_vulnerability()
            .map(generate_script)
    }

    /// Run the action a speech transcript asks for.
    pub async fn handle_transcript(&mut self, transcript: &str) -> Result<VoiceOutcome> {
        let action = interpret_transcript(transcript);
        crate::log_debug!("Voice command {:?} -> {:?}", transcript, action);

        match action {
            VoiceAction::Scan { target } => {
                let target = target
                    .or_else(|| self.target.clone())
                    .ok_or_else(|| anyhow!("No scan target: say an address or pass --target"))?;
                let result = self.run_scan(&target, true).await;
                Ok(VoiceOutcome::Scanned {
                    target,
                    devices: result.devices.len(),
                })
            }
            VoiceAction::Show { mode } => {
                if self.show(mode) {
                    Ok(VoiceOutcome::ViewChanged { mode })
                } else {
                    Ok(VoiceOutcome::ViewUnchanged { mode })
                }
            }
            VoiceAction::ExportReport => {
                let pdf = self.export_report()?;
                Ok(VoiceOutcome::ReportExported {
                    bytes: pdf.len(),
                    pdf,
                })
            }
            VoiceAction::Unrecognized => Ok(VoiceOutcome::Unrecognized),
        }
    }
}
