use anyhow::{Result, anyhow};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::models::Device;

pub type NarrativeFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// A remote service able to write a narrative assessment of a device
pub trait NarrativeProvider: Send + Sync {
    fn provider_id(&self) -> &'static str;
    fn model_name(&self) -> &str;
    fn analyze<'a>(&'a self, client: &'a Client, device: &'a Device) -> NarrativeFuture<'a>;
}

/// Reject blank narratives; providers answering with nothing count as failures.
pub(crate) fn require_text(provider: &str, raw: Option<&str>) -> Result<String> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(anyhow!("{} returned an empty analysis", provider));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_narratives_are_rejected() {
        assert!(require_text("service", None).is_err());
        assert!(require_text("service", Some("  \n ")).is_err());
        assert_eq!(require_text("service", Some(" ok ")).unwrap(), "ok");
    }
}
