use serde::{Deserialize, Serialize};

/// AI routing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Disabled,
    /// Narrative-analysis collaborator (`POST {scanData}` → `{analysis}`)
    Service,
    /// Direct Gemini `generateContent` call
    Gemini,
    /// Service first, Gemini if the service fails
    Hybrid,
}

impl AiMode {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" => Some(Self::Disabled),
            "service" | "backend" => Some(Self::Service),
            "gemini" | "cloud" => Some(Self::Gemini),
            "hybrid" | "auto" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Where an advisory's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySource {
    Ai,
    Fallback,
}

/// Narrative risk assessment for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub address: String,
    pub text: String,
    pub source: AdvisorySource,
    pub ai_provider: Option<String>,
    pub ai_model: Option<String>,
    pub ai_error: Option<String>,
}

impl Advisory {
    pub fn is_degraded(&self) -> bool {
        self.source == AdvisorySource::Fallback
    }
}
