//! Net-Sentinel - network risk dashboard core
//!
//! This crate turns port-scan findings into a navigable risk picture:
//! - Ingestion of the scanning service's device list, with simulated fallback data
//! - Per-device risk scoring and tier distribution
//! - Orbit and topology layouts driven by a view state machine
//! - AI advisories with a local fallback report and character-stream reveal
//! - PDF reports, remediation scripts and JSON/CSV exports

pub mod ai;
pub mod app;
pub mod cli;
pub(crate) mod cli_adapter;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod exports;
pub mod ingest;
pub mod insights;
pub mod layout;
pub mod logging;
pub mod models;
pub mod scanner;
pub mod view;

pub use ai::{Advisor, Advisory, AdvisorySource, AiMode, AiSettings, DisplaySurface, Typewriter};
pub use app::{
    AppCommandResult, AppContext, AppEvent, EventHook, OutputHook,
    execute_command_typed, execute_command_with_context,
};
pub use command::{AppCommand, VoiceAction, interpret_transcript};
pub use config::ScanSettings;
pub use dashboard::{Dashboard, PendingScan, VoiceOutcome};
pub use exports::{
    RemediationScript, export_session_json, export_vulnerabilities_csv, generate_script,
    render_report_pdf,
};
pub use ingest::{IngestError, parse_devices};
pub use insights::{DeviceScore, RiskPenalties, ScoreBand, ScoreBands, TierDistribution};
pub use layout::{OrbitBands, OrbitScene, TopologyGraph};
pub use models::*;
pub use scanner::{
    HttpScanBackend, ScanBackend, ScanFailure, ScanFuture, ScanOrchestrator, ScanRequest,
    fallback_devices,
};
pub use view::{RenderFrame, RenderHook, ScanTicket, ViewMode, ViewStateController};
