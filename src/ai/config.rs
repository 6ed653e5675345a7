use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::types::AiMode;
use crate::config::{
    DEFAULT_AI_ENDPOINT, TYPEWRITER_INTERVAL, env_parse_bool, env_parse_u64, env_var,
};

const DEFAULT_AI_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Runtime AI settings (env-driven).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    pub enabled: bool,
    pub mode: AiMode,
    pub timeout_ms: u64,
    pub service_endpoint: String,
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub typewriter_interval_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AiSettings {
    pub fn from_env() -> Self {
        let enabled = env_parse_bool("NET_SENTINEL_AI_ENABLED", true);
        let mode = if enabled {
            env_var("NET_SENTINEL_AI_MODE")
                .and_then(|v| AiMode::parse(&v))
                .unwrap_or(AiMode::Service)
        } else {
            AiMode::Disabled
        };

        Self {
            enabled,
            mode,
            timeout_ms: env_parse_u64("NET_SENTINEL_AI_TIMEOUT_MS", DEFAULT_AI_TIMEOUT_MS, 500, 120_000),
            service_endpoint: env_var("NET_SENTINEL_AI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_AI_ENDPOINT.to_string()),
            gemini_endpoint: env_var("NET_SENTINEL_AI_GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            gemini_model: env_var("NET_SENTINEL_AI_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_key: env_var("NET_SENTINEL_AI_GEMINI_API_KEY"),
            typewriter_interval_ms: env_parse_u64(
                "NET_SENTINEL_TYPEWRITER_MS",
                TYPEWRITER_INTERVAL.as_millis() as u64,
                0,
                1000,
            ),
        }
    }

    /// Settings that never leave the process: every analysis uses the local report.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            mode: AiMode::Disabled,
            ..Self::from_env()
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_settings_never_select_a_provider() {
        let settings = AiSettings::disabled();
        assert!(!settings.enabled);
        assert_eq!(settings.mode, AiMode::Disabled);
        assert!(settings.timeout() >= Duration::from_millis(500));
    }
}
