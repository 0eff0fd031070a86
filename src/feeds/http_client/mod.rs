//! HTTP client for fetching GeoJSON feeds.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{resolve_user_agent, USER_AGENT};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;

use super::FeedError;

/// HTTP client with request logging.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Create a new HTTP client with the default user agent.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        Self::with_user_agent(timeout, None)
    }

    /// Create a new HTTP client with custom user agent configuration.
    /// - None: Use default quakemap user agent
    /// - Some(custom): Use custom user agent string
    pub fn with_user_agent(
        timeout: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self, FeedError> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let duration = start.elapsed();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        let response = HttpResponse {
            status: response.status(),
            headers,
            response,
        };

        tracing::info!(
            url,
            status = response.status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            content_type = response.content_type().unwrap_or("-"),
            content_length = response.content_length(),
            "GET"
        );

        Ok(response)
    }

    /// GET a URL and parse the body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FeedError> {
        let response = self.get(url).await?;
        if !response.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: response.status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
