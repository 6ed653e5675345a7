use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::{Advisory, AiSettings, SurfaceHook};
use crate::cli::{usage_text, version_text};
use crate::command::{AppCommand, VoiceAction, interpret_transcript};
use crate::config::ScanSettings;
use crate::dashboard::{Dashboard, VoiceOutcome};
use crate::exports::{REPORT_FILE_NAME, RemediationScript, export_session_json};
use crate::insights::{RiskPenalties, ScoreBands};
use crate::models::{ScanResult, ScanSource};
use crate::view::{RenderFrame, RenderHook, ViewMode};

pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type EventHook = Arc<dyn Fn(&AppEvent) + Send + Sync>;

#[derive(Clone)]
pub struct AppContext {
    scan_settings: ScanSettings,
    ai_settings: AiSettings,
    output_hook: OutputHook,
    event_hook: EventHook,
    render_hook: RenderHook,
    surface_hook: SurfaceHook,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppEvent {
    Info {
        message: String,
    },
    Warn {
        message: String,
    },
    Error {
        message: String,
    },
    /// Simulated data or text replaced a collaborator's answer
    Degraded {
        component: String,
        message: String,
    },
    ScanStarted {
        ticket: u64,
        target: String,
    },
    ScanApplied {
        ticket: u64,
        devices: usize,
        source: ScanSource,
    },
    /// A newer scan was issued before this one finished
    ScanDiscarded {
        ticket: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct ScanView {
    pub scan: ScanResult,
    pub mode: ViewMode,
    pub selected: Option<String>,
    pub frame: RenderFrame,
}

#[derive(Debug, Serialize)]
pub struct ReportWritten {
    pub path: PathBuf,
    pub bytes: usize,
    pub devices: usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum AppCommandResult {
    HelpText(String),
    VersionText(String),
    Scan(ScanView),
    Analysis(Advisory),
    Report(ReportWritten),
    Script(RemediationScript),
    Voice {
        action: VoiceAction,
        outcome: VoiceOutcome,
        scan: Option<ScanView>,
        report: Option<ReportWritten>,
    },
}

impl Default for AppContext {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppContext {
    pub fn from_env() -> Self {
        Self {
            scan_settings: ScanSettings::from_env(),
            ai_settings: AiSettings::from_env(),
            output_hook: Arc::new(|line| println!("{}", line)),
            event_hook: Arc::new(|_| {}),
            render_hook: Arc::new(|_| {}),
            surface_hook: Arc::new(|_| {}),
        }
    }

    pub fn with_scan_settings(mut self, scan_settings: ScanSettings) -> Self {
        self.scan_settings = scan_settings;
        self
    }

    pub fn with_ai_settings(mut self, ai_settings: AiSettings) -> Self {
        self.ai_settings = ai_settings;
        self
    }

    pub fn with_output_hook(mut self, output_hook: OutputHook) -> Self {
        self.output_hook = output_hook;
        self
    }

    pub fn with_event_hook(mut self, event_hook: EventHook) -> Self {
        self.event_hook = event_hook;
        self
    }

    pub fn with_render_hook(mut self, render_hook: RenderHook) -> Self {
        self.render_hook = render_hook;
        self
    }

    pub fn with_surface_hook(mut self, surface_hook: SurfaceHook) -> Self {
        self.surface_hook = surface_hook;
        self
    }

    pub fn scan_settings(&self) -> &ScanSettings {
        &self.scan_settings
    }

    pub fn ai_settings(&self) -> &AiSettings {
        &self.ai_settings
    }

    pub fn render_hook(&self) -> RenderHook {
        Arc::clone(&self.render_hook)
    }

    pub fn surface_hook(&self) -> SurfaceHook {
        Arc::clone(&self.surface_hook)
    }

    pub fn emit_line(&self, line: &str) {
        (self.output_hook)(line);
    }

    pub fn emit_event(&self, event: AppEvent) {
        (self.event_hook)(&event);
    }
}

/// Compatibility wrapper for CLI adapter entrypoint.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    crate::cli_adapter::run(args).await
}

/// Compatibility wrapper for CLI adapter entrypoint.
pub async fn run_with_context<I, S>(args: I, context: &AppContext) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    crate::cli_adapter::run_with_context(args, context).await
}

/// Execute a pre-parsed command with an explicit execution context.
pub async fn execute_command_with_context(command: AppCommand, context: &AppContext) -> Result<()> {
    let result = execute_command_typed(command, context).await?;
    emit_command_result(&result, context)
}

/// Execute a pre-parsed command and return a strongly-typed result payload.
pub async fn execute_command_typed(
    command: AppCommand,
    context: &AppContext,
) -> Result<AppCommandResult> {
    match command {
        AppCommand::Help => Ok(AppCommandResult::HelpText(usage_text())),
        AppCommand::Version => Ok(AppCommandResult::VersionText(version_text())),
        AppCommand::Scan {
            target,
            deep_scan,
            view,
        } => {
            let dashboard = scanned_dashboard(&target, deep_scan, view, context).await?;
            Ok(AppCommandResult::Scan(scan_view(&dashboard)))
        }
        AppCommand::Analyze { target, device } => {
            let mut dashboard = scanned_dashboard(&target, true, ViewMode::Orbit, context).await?;
            if let Some(address) = device.as_deref() {
                select_or_fail(&mut dashboard, address, &target)?;
            }

            let advisory = dashboard
                .analyze_selected()
                .await
                .ok_or_else(|| anyhow!("Scan of {} found no devices to analyze", target))?;
            Ok(AppCommandResult::Analysis(advisory))
        }
        AppCommand::Report { target, output } => {
            let dashboard = scanned_dashboard(&target, true, ViewMode::Orbit, context).await?;
            let pdf = dashboard.export_report()?;
            let report = write_report(&pdf, output, dashboard.controller().devices().len()).await?;
            Ok(AppCommandResult::Report(report))
        }
        AppCommand::Script {
            target,
            port,
            device,
        } => {
            let mut dashboard = scanned_dashboard(&target, true, ViewMode::Orbit, context).await?;
            if let Some(address) = device.as_deref() {
                select_or_fail(&mut dashboard, address, &target)?;
            }

            let selected = dashboard
                .controller()
                .selected_address()
                .unwrap_or("<none>")
                .to_string();
            dashboard
                .inspect_vulnerability(port)
                .ok_or_else(|| anyhow!("No finding on port {} for device {}", port, selected))?;
            let script = dashboard
                .remediation_script()
                .ok_or_else(|| anyhow!("No finding selected for script generation"))?;
            Ok(AppCommandResult::Script(script))
        }
        AppCommand::Voice {
            transcript,
            target,
            output,
        } => {
            let action = interpret_transcript(&transcript);
            let mut dashboard = Dashboard::new(context)?;

            match (&action, target.as_deref()) {
                (VoiceAction::Scan { .. }, Some(target)) => dashboard.remember_target(target),
                (VoiceAction::Scan { .. } | VoiceAction::Unrecognized, _) => {}
                (_, Some(target)) => {
                    dashboard.run_scan(target, true).await;
                }
                (_, None) => {
                    return Err(anyhow!(
                        "Voice command '{}' needs --target <TARGET> to load a scan first",
                        transcript
                    ));
                }
            }

            let outcome = dashboard.handle_transcript(&transcript).await?;
            let mut scan = None;
            let mut report = None;
            match &outcome {
                VoiceOutcome::Scanned { .. }
                | VoiceOutcome::ViewChanged { .. }
                | VoiceOutcome::ViewUnchanged { .. } => scan = Some(scan_view(&dashboard)),
                VoiceOutcome::ReportExported { pdf, .. } => {
                    let devices = dashboard.controller().devices().len();
                    report = Some(write_report(pdf, output, devices).await?);
                }
                VoiceOutcome::Unrecognized => context.emit_event(AppEvent::Warn {
                    message: format!("Voice command not recognized: {}", transcript),
                }),
            }

            Ok(AppCommandResult::Voice {
                action,
                outcome,
                scan,
                report,
            })
        }
    }
}

async fn write_report(pdf: &[u8], output: Option<PathBuf>, devices: usize) -> Result<ReportWritten> {
    let path = output.unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));
    tokio::fs::write(&path, pdf)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(ReportWritten {
        path,
        bytes: pdf.len(),
        devices,
    })
}

async fn scanned_dashboard(
    target: &str,
    deep_scan: bool,
    view: ViewMode,
    context: &AppContext,
) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(context)?;
    dashboard.show(view);
    dashboard.run_scan(target, deep_scan).await;
    Ok(dashboard)
}

fn select_or_fail(dashboard: &mut Dashboard, address: &str, target: &str) -> Result<()> {
    if dashboard.select_device(address) {
        Ok(())
    } else {
        Err(anyhow!("Device {} not found in scan of {}", address, target))
    }
}

fn scan_view(dashboard: &Dashboard) -> ScanView {
    let controller = dashboard.controller();
    ScanView {
        scan: ScanResult {
            target: dashboard.target().unwrap_or_default().to_string(),
            source: controller.source().unwrap_or(ScanSource::Live),
            devices: controller.devices().to_vec(),
        },
        mode: controller.mode(),
        selected: controller.selected_address().map(str::to_string),
        frame: controller.active_frame(),
    }
}

fn emit_scan_view(view: &ScanView, context: &AppContext) -> Result<()> {
    let session = export_session_json(&view.scan, &RiskPenalties::default(), &ScoreBands::default())
        .context("Failed to serialize scan session JSON")?;
    context.emit_line(&session);

    let frame =
        serde_json::to_string_pretty(&view.frame).context("Failed to serialize view frame")?;
    context.emit_line(&frame);
    Ok(())
}

fn emit_command_result(result: &AppCommandResult, context: &AppContext) -> Result<()> {
    match result {
        AppCommandResult::HelpText(text) => {
            context.emit_line(text);
            Ok(())
        }
        AppCommandResult::VersionText(text) => {
            context.emit_line(text);
            Ok(())
        }
        AppCommandResult::Scan(view) => emit_scan_view(view, context),
        AppCommandResult::Analysis(advisory) => {
            context.emit_line(&advisory.text);
            Ok(())
        }
        AppCommandResult::Report(report) => {
            emit_report_written(report, context);
            Ok(())
        }
        AppCommandResult::Script(script) => {
            context.emit_line(&script.content);
            Ok(())
        }
        AppCommandResult::Voice {
            action,
            scan,
            report,
            ..
        } => {
            let output =
                serde_json::to_string_pretty(action).context("Failed to serialize voice action")?;
            context.emit_line(&output);
            if let Some(report) = report {
                emit_report_written(report, context);
            }
            match scan {
                Some(view) => emit_scan_view(view, context),
                None => Ok(()),
            }
        }
    }
}

fn emit_report_written(report: &ReportWritten, context: &AppContext) {
    context.emit_line(&format!(
        "Report written to {} ({} bytes, {} devices)",
        report.path.display(),
        report.bytes,
        report.devices
    ));
}
