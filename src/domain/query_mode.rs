// Query mode domain model - live sliding window vs. a fixed historical day
use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Which slice of time the dashboard is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "day", rename_all = "lowercase")]
pub enum QueryMode {
    Live,
    Historical(NaiveDate),
}

impl QueryMode {
    /// Startup mode: today's UTC day, navigable with the ±1 day controls.
    pub fn today() -> Self {
        QueryMode::Historical(Utc::now().date_naive())
    }

    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            QueryMode::Live => None,
            QueryMode::Historical(day) => Some(*day),
        }
    }

    /// Shift by whole days. Live mode shifts relative to today.
    pub fn shifted(&self, days: i64) -> Self {
        let base = self.day().unwrap_or_else(|| Utc::now().date_naive());
        let shifted = if days >= 0 {
            base.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            base.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        QueryMode::Historical(shifted.unwrap_or(base))
    }

    pub fn label(&self) -> String {
        match self {
            QueryMode::Live => "Live (latest window)".to_string(),
            QueryMode::Historical(day) => format!("Selected day: {}", day.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Median,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Median => "median",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketWidth {
    #[serde(rename = "5min")]
    FiveMinutes,
}

impl BucketWidth {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketWidth::FiveMinutes => "5min",
        }
    }
}

/// Sliding-window lengths used in live mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveWindows {
    pub window_minutes: u32,
    pub track_minutes: u32,
}

impl Default for LiveWindows {
    fn default() -> Self {
        Self {
            window_minutes: 3 * MINUTES_PER_DAY,
            track_minutes: 180,
        }
    }
}

/// Concrete per-cycle fetch parameters derived from a [`QueryMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedParams {
    pub day: Option<NaiveDate>,
    pub window_minutes: u32,
    pub track_minutes: u32,
    pub aggregation: Option<Aggregation>,
    pub bucket_width: Option<BucketWidth>,
}

impl ResolvedParams {
    pub fn day_param(&self) -> Option<String> {
        self.day.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

/// Historical days are median-aggregated into 5 minute buckets over the full
/// day; live mode returns raw points over the sliding window.
pub fn resolve(mode: &QueryMode, live: LiveWindows) -> ResolvedParams {
    match mode {
        QueryMode::Historical(day) => ResolvedParams {
            day: Some(*day),
            window_minutes: MINUTES_PER_DAY,
            track_minutes: MINUTES_PER_DAY,
            aggregation: Some(Aggregation::Median),
            bucket_width: Some(BucketWidth::FiveMinutes),
        },
        QueryMode::Live => ResolvedParams {
            day: None,
            window_minutes: live.window_minutes,
            track_minutes: live.track_minutes,
            aggregation: None,
            bucket_width: None,
        },
    }
}
