//! Remote GeoJSON feeds: the earthquake summary and the plate boundaries.

pub mod http_client;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::Settings;

pub use http_client::FeedClient;

/// Errors that can occur while fetching or reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not a GeoJSON FeatureCollection")]
    NotACollection,
}

/// Which of the two feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Earthquakes,
    TectonicPlates,
}

impl FeedKind {
    pub const ALL: [FeedKind; 2] = [FeedKind::Earthquakes, FeedKind::TectonicPlates];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earthquakes => "earthquakes",
            Self::TectonicPlates => "tectonic_plates",
        }
    }

    /// Overlay name shown in the layer control.
    pub fn overlay_name(&self) -> &'static str {
        match self {
            Self::Earthquakes => "Earthquakes",
            Self::TectonicPlates => "Tectonic plates",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can produce the raw FeatureCollection for a feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, kind: FeedKind) -> Result<serde_json::Value, FeedError>;
}

/// Feeds fetched over HTTP from the configured URLs.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: FeedClient,
    earthquakes_url: String,
    plates_url: String,
}

impl HttpFeedSource {
    pub fn new(client: FeedClient, earthquakes_url: String, plates_url: String) -> Self {
        Self {
            client,
            earthquakes_url,
            plates_url,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FeedError> {
        let client = FeedClient::with_user_agent(
            settings.request_timeout(),
            settings.user_agent.as_deref(),
        )?;
        Ok(Self::new(
            client,
            settings.earthquake_feed_url.to_string(),
            settings.plates_feed_url.to_string(),
        ))
    }

    pub fn url(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::Earthquakes => &self.earthquakes_url,
            FeedKind::TectonicPlates => &self.plates_url,
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, kind: FeedKind) -> Result<serde_json::Value, FeedError> {
        let url = self.url(kind);
        tracing::debug!(feed = %kind, url, "Fetching feed");
        self.client.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_kind_names() {
        assert_eq!(FeedKind::Earthquakes.as_str(), "earthquakes");
        assert_eq!(FeedKind::TectonicPlates.to_string(), "tectonic_plates");
        assert_eq!(FeedKind::TectonicPlates.overlay_name(), "Tectonic plates");
    }

    #[test]
    fn test_http_source_urls() {
        let client = FeedClient::new(std::time::Duration::from_secs(5)).unwrap();
        let source = HttpFeedSource::new(
            client,
            "https://example.com/quakes.geojson".to_string(),
            "https://example.com/plates.json".to_string(),
        );
        assert_eq!(
            source.url(FeedKind::Earthquakes),
            "https://example.com/quakes.geojson"
        );
        assert_eq!(
            source.url(FeedKind::TectonicPlates),
            "https://example.com/plates.json"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = FeedError::Status {
            url: "https://example.com/feed".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "https://example.com/feed returned HTTP 503");
    }
}
