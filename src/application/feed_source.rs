// Feed source trait for the remote data service
use crate::application::feed_catalog::FeedRequest;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a single feed produced no data this cycle.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one feed once. No retries: a failure is reported for this
    /// cycle and the feed is polled again on the next one.
    async fn fetch_json(&self, request: &FeedRequest) -> Result<Value, FeedError>;
}
