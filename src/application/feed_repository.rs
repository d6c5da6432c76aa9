// Repository trait for remote feed access
use async_trait::async_trait;

use crate::domain::snapshot::SensorError;

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Fetch one feed address and return the raw response body.
    ///
    /// Implementations report transport problems as `SensorError::Network`
    /// and non-2xx responses as `SensorError::Http`; they never panic on a
    /// failing feed.
    async fn fetch_feed(&self, url: &str) -> Result<String, SensorError>;
}
