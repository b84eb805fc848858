// Concurrent fetch orchestrator - fans out every feed and joins on all of them
use crate::application::feed_catalog::FeedDescriptor;
use crate::application::feed_source::FeedSource;
use crate::domain::query_mode::{QueryMode, ResolvedParams};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

/// Lifecycle events of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    CycleStart { cycle: u64, mode: QueryMode },
    Ok { cycle: u64, name: String },
    Failed { cycle: u64, name: String, reason: String },
    CycleEnd { cycle: u64, failed: usize },
}

impl ProgressEvent {
    /// Overlay log line for per-feed events.
    pub fn log_line(&self) -> Option<String> {
        match self {
            ProgressEvent::Ok { name, .. } => Some(format!("✓ {}", name)),
            ProgressEvent::Failed { name, reason, .. } => Some(format!("✗ {} — {}", name, reason)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub name: String,
    pub payload: Option<Value>,
    pub succeeded: bool,
}

/// Outcomes of one cycle, one per catalog feed, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct FetchResults {
    outcomes: Vec<FetchOutcome>,
}

impl FetchResults {
    pub fn from_outcomes(outcomes: Vec<FetchOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcome(&self, name: &str) -> Option<&FetchOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Payload of a feed, absent when it failed or is unknown.
    pub fn payload(&self, name: &str) -> Option<&Value> {
        self.outcome(name).and_then(|o| o.payload.as_ref())
    }

    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }
}

/// Fetch every feed concurrently. A failing feed is recorded as absent and
/// reported through `progress`; it never affects the other feeds. Returns
/// only once every feed has resolved.
pub async fn fetch_all<F>(
    source: &dyn FeedSource,
    catalog: &[FeedDescriptor],
    params: &ResolvedParams,
    cycle: u64,
    progress: F,
) -> FetchResults
where
    F: Fn(ProgressEvent),
{
    let progress = &progress;
    let fetches = catalog.iter().map(|feed| async move {
        let request = feed.request(params);
        match source.fetch_json(&request).await {
            Ok(payload) => {
                progress(ProgressEvent::Ok {
                    cycle,
                    name: feed.name.to_string(),
                });
                FetchOutcome {
                    name: feed.name.to_string(),
                    payload: Some(payload),
                    succeeded: true,
                }
            }
            Err(e) => {
                tracing::warn!(feed = feed.name, cycle, "Feed failed: {}", e);
                progress(ProgressEvent::Failed {
                    cycle,
                    name: feed.name.to_string(),
                    reason: e.to_string(),
                });
                FetchOutcome {
                    name: feed.name.to_string(),
                    payload: None,
                    succeeded: false,
                }
            }
        }
    });

    FetchResults::from_outcomes(join_all(fetches).await)
}
