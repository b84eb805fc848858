// Telemetry feed payloads and chart points
//
// Every upstream field is optional: a payload with nothing in it is valid
// input and renders as "no data".
use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: Option<f64>) -> Self {
        Self { time_ms, value }
    }
}

/// Parse an upstream timestamp into epoch milliseconds. Offset-less
/// timestamps are read as UTC.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.timestamp_millis());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%:z"]
        .iter()
        .find_map(|fmt| {
            DateTime::parse_from_str(raw, fmt)
                .map(|ts| ts.timestamp_millis())
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(raw, fmt)
                        .ok()
                        .map(|ts| ts.and_utc().timestamp_millis())
                })
        })
}

/// Convert raw `[timestamp, value]` pairs into chart points, keeping input
/// order and silently dropping pairs whose timestamp does not parse.
pub fn to_chart_points(raw: &[Vec<Value>]) -> Vec<TimeSeriesPoint> {
    raw.iter()
        .filter_map(|pair| {
            let time_ms = pair.first()?.as_str().and_then(parse_timestamp_ms)?;
            let value = pair.get(1).and_then(Value::as_f64);
            Some(TimeSeriesPoint::new(time_ms, value))
        })
        .collect()
}

/// Decode a feed payload into its record type. Shape mismatches decode as
/// the all-absent record.
pub fn decode<T>(payload: Option<&Value>) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    match payload {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::debug!("Payload did not match expected shape: {}", e);
            T::default()
        }),
        None => T::default(),
    }
}

/// List field that keeps the elements which decode and drops the rest.
/// `null` reads as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Optional record that reads as absent when it does not decode.
fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(raw).ok().flatten())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default, deserialize_with = "lenient_record")]
    pub summary: Option<SummaryStats>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub evidence: Vec<EvidenceRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub kplast: Option<f64>,
    #[serde(default)]
    pub kpmax_alltime: Option<f64>,
    #[serde(default)]
    pub rows_total: Option<u64>,
    #[serde(default)]
    pub rows_24h: Option<u64>,
}

/// Quiet-vs-storm medians for one metric, as supplied by the summary feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvidenceRecord {
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub quiet_med: Option<f64>,
    #[serde(default)]
    pub storm_med: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestResponse {
    #[serde(default)]
    pub latest: Option<LatestReading>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestReading {
    #[serde(default)]
    pub ts_iso: Option<String>,
    #[serde(default)]
    pub kp: Option<f64>,
    #[serde(default)]
    pub tec: Option<f64>,
    #[serde(default)]
    pub tec_source: Option<String>,
    #[serde(default)]
    pub gps_fix: Option<Value>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub alt: Option<f64>,
    #[serde(default)]
    pub pdop: Option<f64>,
    #[serde(default)]
    pub hdop: Option<f64>,
    #[serde(default)]
    pub vdop: Option<f64>,
    #[serde(default)]
    pub sv_used: Option<f64>,
    #[serde(default)]
    pub sv_tot: Option<f64>,
    #[serde(default)]
    pub cn0_mean: Option<f64>,
}

impl LatestReading {
    /// Fix quality as display text; upstream sends either a string or a number.
    pub fn fix_label(&self) -> Option<String> {
        match &self.gps_fix {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlossaryResponse {
    #[serde(default)]
    pub items: Option<Vec<GlossaryItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GlossaryItem {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub points: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub points: Vec<TrackPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackPoint {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}
