//! Upstream REST API access and latency probing

use crate::error::{EdgeError, Result};
use moka::future::Cache;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const LATENCY_SAMPLE_TTL_SECS: u64 = 5;
const LATENCY_SAMPLE_KEY: &str = "upstream";

/// HTTP client for the dashboard's upstream REST API
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(EdgeError::Config(format!(
                "Upstream URL cannot be a base: {}",
                base_url
            )));
        }
        // Joining relative paths keeps the last segment only with a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve a dashboard path against the upstream base
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Fetch a JSON document from the upstream API
    pub async fn fetch_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = self.url_for(path)?;
        debug!(url = %url, "Fetching from upstream");

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Upstream request failed");
            return Err(EdgeError::UpstreamStatus(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Measures round-trip time to the upstream API.
///
/// A sample is reused for a few seconds so bursts of media requests do not
/// each pay for a probe.
pub struct LatencyProbe {
    client: Client,
    url: Url,
    samples: Cache<&'static str, f64>,
}

impl LatencyProbe {
    pub fn new(client: Client, url: Url) -> Self {
        let samples = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(LATENCY_SAMPLE_TTL_SECS))
            .build();

        Self {
            client,
            url,
            samples,
        }
    }

    /// Round-trip time in milliseconds, or `None` when the probe failed
    pub async fn measure(&self) -> Option<f64> {
        if let Some(sample) = self.samples.get(LATENCY_SAMPLE_KEY).await {
            return Some(sample);
        }

        let started = Instant::now();
        match self.client.head(self.url.clone()).send().await {
            Ok(_) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                debug!(url = %self.url, elapsed_ms, "Measured upstream latency");
                self.samples.insert(LATENCY_SAMPLE_KEY, elapsed_ms).await;
                Some(elapsed_ms)
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Latency probe failed");
                None
            }
        }
    }
}
