use chrono::{Local, NaiveDate};
use reqwest::Client;

use crate::ai::config::AiSettings;
use crate::ai::fallback::fallback_report;
use crate::ai::provider::NarrativeProvider;
use crate::ai::providers::{gemini::GeminiProvider, service::ServiceProvider};
use crate::ai::types::{Advisory, AdvisorySource, AiMode};
use crate::models::Device;

/// Routes a device to the configured narrative providers, in order, and
/// falls back to the local report when none of them answers.
pub struct Advisor {
    client: Option<Client>,
    providers: Vec<Box<dyn NarrativeProvider>>,
    setup_error: Option<String>,
}

impl Advisor {
    pub fn from_settings(settings: &AiSettings) -> Self {
        if !settings.enabled || settings.mode == AiMode::Disabled {
            return Self {
                client: None,
                providers: Vec::new(),
                setup_error: Some("AI analysis disabled".to_string()),
            };
        }

        let client = match Client::builder().timeout(settings.timeout()).build() {
            Ok(c) => c,
            Err(e) => {
                return Self {
                    client: None,
                    providers: Vec::new(),
                    setup_error: Some(format!("AI client init failed: {}", e)),
                };
            }
        };

        let mut providers: Vec<Box<dyn NarrativeProvider>> = Vec::new();
        let mut setup_error = None;

        if matches!(settings.mode, AiMode::Service | AiMode::Hybrid) {
            providers.push(Box::new(ServiceProvider::new(
                settings.service_endpoint.clone(),
            )));
        }
        if matches!(settings.mode, AiMode::Gemini | AiMode::Hybrid) {
            match build_gemini_provider(settings) {
                Ok(provider) => providers.push(Box::new(provider)),
                Err(e) => setup_error = Some(format!("Cloud AI unavailable: {}", e)),
            }
        }

        Self {
            client: Some(client),
            providers,
            setup_error,
        }
    }

    pub fn with_providers(client: Client, providers: Vec<Box<dyn NarrativeProvider>>) -> Self {
        Self {
            client: Some(client),
            providers,
            setup_error: None,
        }
    }

    pub async fn analyze(&self, device: &Device) -> Advisory {
        self.analyze_on(device, Local::now().date_naive()).await
    }

    /// Same as [`Advisor::analyze`], with the fallback report stamped with `date`.
    pub async fn analyze_on(&self, device: &Device, date: NaiveDate) -> Advisory {
        let mut errors: Vec<String> = self.setup_error.iter().cloned().collect();

        if let Some(client) = &self.client {
            for provider in &self.providers {
                match provider.analyze(client, device).await {
                    Ok(text) => {
                        return Advisory {
                            address: device.address.clone(),
                            text,
                            source: AdvisorySource::Ai,
                            ai_provider: Some(provider.provider_id().to_string()),
                            ai_model: Some(provider.model_name().to_string()),
                            ai_error: None,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            "{} analysis of {} failed: {:#}",
                            provider.provider_id(),
                            device.address,
                            e
                        );
                        errors.push(format!("{}={:#}", provider.provider_id(), e));
                    }
                }
            }
        }

        if errors.is_empty() {
            errors.push("no AI provider configured".to_string());
        }

        Advisory {
            address: device.address.clone(),
            text: fallback_report(device, date),
            source: AdvisorySource::Fallback,
            ai_provider: None,
            ai_model: None,
            ai_error: Some(errors.join(", ")),
        }
    }
}

fn build_gemini_provider(settings: &AiSettings) -> anyhow::Result<GeminiProvider> {
    let api_key = settings.gemini_api_key.clone().ok_or_else(|| {
        anyhow::anyhow!("NET_SENTINEL_AI_GEMINI_API_KEY is required for gemini/hybrid mode")
    })?;

    Ok(GeminiProvider::new(
        settings.gemini_endpoint.clone(),
        settings.gemini_model.clone(),
        api_key,
    ))
}
