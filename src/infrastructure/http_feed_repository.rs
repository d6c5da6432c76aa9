// HTTP implementation of the feed repository
use async_trait::async_trait;
use std::time::Duration;

use crate::application::feed_repository::FeedRepository;
use crate::domain::snapshot::SensorError;

/// Feeds are only ever served from the telemetry host's time-series
/// export path; any other address in configuration is refused without a
/// request being made.
pub const ALLOWED_FEED_PREFIX: &str = "https://timeseries.scotwater.io/kisters/";

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HttpFeedRepository {
    client: reqwest::Client,
    allowed_prefix: String,
}

impl HttpFeedRepository {
    pub fn new() -> Self {
        Self::with_allowed_prefix(ALLOWED_FEED_PREFIX)
    }

    pub fn with_allowed_prefix(prefix: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("reqwest client construction failed");
        Self {
            client,
            allowed_prefix: prefix.into(),
        }
    }
}

impl Default for HttpFeedRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedRepository for HttpFeedRepository {
    async fn fetch_feed(&self, url: &str) -> Result<String, SensorError> {
        if !url.starts_with(&self.allowed_prefix) {
            return Err(SensorError::DisallowedAddress(url.to_string()));
        }

        let response = self
            .client
            .get(url)
            .header("Accept", "text/plain")
            .send()
            .await
            .map_err(|e| SensorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SensorError::Http(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| SensorError::Network(e.to_string()))
    }
}
