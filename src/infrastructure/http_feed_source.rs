// HTTP feed source - single GET per feed against the data service
use crate::application::feed_catalog::FeedRequest;
use crate::application::feed_source::{FeedError, FeedSource};
use crate::infrastructure::tolerant_json::parse_tolerant;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedSource {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, request: &FeedRequest) -> String {
        request.url(&self.base_url)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_json(&self, request: &FeedRequest) -> Result<Value, FeedError> {
        let url = self.url_for(request);
        tracing::debug!(feed = request.name, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FeedError::Body(e.to_string()))?;

        Ok(parse_tolerant(&text)?)
    }
}
