//! Risk insights
//!
//! Per-device scoring and the per-tier distribution of findings

pub mod distribution;
pub mod scoring;

pub use distribution::TierDistribution;
pub use scoring::{DeviceScore, RiskPenalties, ScoreBand, ScoreBands, score_device};
