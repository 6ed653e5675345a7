use anyhow::{Context, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::provider::{NarrativeFuture, NarrativeProvider, require_text};
use crate::models::Device;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    scan_data: &'a Device,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    analysis: Option<String>,
}

/// Narrative-analysis collaborator speaking `{scanData}` → `{analysis}`
#[derive(Debug, Clone)]
pub struct ServiceProvider {
    endpoint: String,
}

impl ServiceProvider {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

impl NarrativeProvider for ServiceProvider {
    fn provider_id(&self) -> &'static str {
        "service"
    }

    fn model_name(&self) -> &str {
        &self.endpoint
    }

    fn analyze<'a>(&'a self, client: &'a Client, device: &'a Device) -> NarrativeFuture<'a> {
        Box::pin(async move {
            let response = client
                .post(&self.endpoint)
                .json(&AnalysisRequest { scan_data: device })
                .send()
                .await
                .context("Failed to call narrative-analysis endpoint")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!("Analysis request failed with {}: {}", status, body));
            }

            let payload: AnalysisResponse = response
                .json()
                .await
                .context("Failed to parse analysis response JSON")?;

            require_text(self.provider_id(), payload.analysis.as_deref())
        })
    }
}
