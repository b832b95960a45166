//! HTTP asset fetching

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use pdfgen_core::AssetFetcher;
use tracing::debug;

/// Fetches assets and documents over HTTP(S).
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(location)
            .send()
            .await
            .with_context(|| format!("GET {}", location))?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes from {}", bytes.len(), location);
        Ok(bytes.to_vec())
    }
}
