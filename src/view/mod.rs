//! View state and render frames for the orbit and topology surfaces

pub mod controller;
pub mod frames;

pub use controller::{ScanTicket, ViewMode, ViewStateController};
pub use frames::{DeviceCard, RenderFrame, RenderHook, VulnerabilityDetail};
