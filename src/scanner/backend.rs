//! Scanning collaborator seam
//!
//! The port scan itself runs elsewhere; this module only knows how to ask
//! for one and how to classify the answer.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::config::ScanSettings;
use crate::ingest::{IngestError, parse_devices};
use crate::models::Device;

/// Body sent to the scanning collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub address: String,
    pub deep_scan: bool,
}

impl ScanRequest {
    pub fn new(address: &str, deep_scan: bool) -> Self {
        Self {
            address: address.trim().to_string(),
            deep_scan,
        }
    }
}

/// Why a scan request did not produce usable devices
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanFailure {
    #[error("scan backend answered with status {0}")]
    Status(u16),
    #[error("scan backend unreachable: {0}")]
    Transport(String),
    #[error("scan backend returned no devices")]
    Empty,
    #[error("scan backend returned malformed data: {0}")]
    Malformed(String),
}

impl From<IngestError> for ScanFailure {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Empty => ScanFailure::Empty,
            IngestError::Malformed(e) => ScanFailure::Malformed(e.to_string()),
            IngestError::NotAnArray(kind) => {
                ScanFailure::Malformed(format!("expected a device array, found {}", kind))
            }
        }
    }
}

pub type ScanFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Device>, ScanFailure>> + Send + 'a>>;

pub trait ScanBackend: Send + Sync {
    fn backend_id(&self) -> &'static str;
    fn request_scan<'a>(&'a self, request: &'a ScanRequest) -> ScanFuture<'a>;
}

/// JSON-over-HTTP scanning collaborator
#[derive(Debug, Clone)]
pub struct HttpScanBackend {
    client: Client,
    endpoint: String,
}

impl HttpScanBackend {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn from_settings(settings: &ScanSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Scan client init failed: {}", e))?;
        Ok(Self::new(client, settings.endpoint.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScanBackend for HttpScanBackend {
    fn backend_id(&self) -> &'static str {
        "http"
    }

    fn request_scan<'a>(&'a self, request: &'a ScanRequest) -> ScanFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| ScanFailure::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScanFailure::Status(status.as_u16()));
            }

            let body = response
                .text()
                .await
                .map_err(|e| ScanFailure::Transport(e.to_string()))?;

            Ok(parse_devices(&body)?)
        })
    }
}
