// Quiet-vs-storm evidence table
use super::telemetry::EvidenceRecord;
use serde::Serialize;

pub const DEFAULT_ALARM_THRESHOLD: f64 = 3.0;
pub const NO_EVIDENCE_MESSAGE: &str = "No evidence (insufficient data in one of the two regimes).";
const MISSING: &str = "—";

/// Which direction of change counts as deterioration for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    HigherIsWorse,
    HigherIsBetter,
    Neutral,
}

pub fn polarity_for(metric: &str) -> Polarity {
    match metric {
        "noise_dbm" | "busy_ratio" | "scan_p50" | "scan_p90" | "scan_p10" | "hdop" | "vdop"
        | "pdop" | "tec" | "mag_norm_ut" => Polarity::HigherIsWorse,
        "cn0_mean" | "sv_used" => Polarity::HigherIsBetter,
        _ => Polarity::Neutral,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSeverity {
    Bad,
    Warn,
    Neutral,
}

impl DeltaSeverity {
    pub fn color(&self) -> Option<&'static str> {
        match self {
            DeltaSeverity::Bad => Some("#B00020"),
            DeltaSeverity::Warn => Some("#C77700"),
            DeltaSeverity::Neutral => None,
        }
    }
}

pub fn delta_severity(metric: &str, delta: Option<f64>, alarm_threshold: f64) -> DeltaSeverity {
    let Some(delta) = delta.filter(|d| d.is_finite()) else {
        return DeltaSeverity::Neutral;
    };
    let deteriorated = match polarity_for(metric) {
        Polarity::HigherIsWorse => delta > 0.0,
        Polarity::HigherIsBetter => delta < 0.0,
        Polarity::Neutral => false,
    };
    if !deteriorated {
        DeltaSeverity::Neutral
    } else if delta.abs() >= alarm_threshold {
        DeltaSeverity::Bad
    } else {
        DeltaSeverity::Warn
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceRow {
    pub band: String,
    pub metric: String,
    pub metric_label: String,
    pub quiet_median: Option<f64>,
    pub storm_median: Option<f64>,
    pub delta: Option<f64>,
    pub delta_severity: DeltaSeverity,
    /// Text color of the delta cell; `None` keeps the table's default.
    pub delta_color: Option<&'static str>,
    pub quiet_text: String,
    pub storm_text: String,
    pub delta_text: String,
}

/// Rendered content of the evidence table: either rows, or a single
/// explanatory placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EvidenceTable {
    Rows { rows: Vec<EvidenceRow> },
    Placeholder { message: String },
}

pub fn build_evidence_table(records: &[EvidenceRecord], alarm_threshold: f64) -> EvidenceTable {
    if records.is_empty() {
        return EvidenceTable::Placeholder {
            message: NO_EVIDENCE_MESSAGE.to_string(),
        };
    }

    let rows = records
        .iter()
        .map(|record| {
            let metric = record.metric.as_str();
            let delta = match (record.quiet_med, record.storm_med) {
                (Some(quiet), Some(storm)) => Some(storm - quiet),
                _ => record.delta,
            };
            let severity = delta_severity(metric, delta, alarm_threshold);
            EvidenceRow {
                band: band_label(record.band.as_deref()),
                metric: record.metric.clone(),
                metric_label: metric_label(metric).to_string(),
                quiet_median: record.quiet_med,
                storm_median: record.storm_med,
                delta,
                delta_severity: severity,
                delta_color: severity.color(),
                quiet_text: format_metric_value(record.quiet_med, metric),
                storm_text: format_metric_value(record.storm_med, metric),
                delta_text: format_metric_value(delta, metric),
            }
        })
        .collect();

    EvidenceTable::Rows { rows }
}

pub fn band_label(band: Option<&str>) -> String {
    match band {
        None | Some("") => "GPS".to_string(),
        Some("24") => "2.4 GHz".to_string(),
        Some("58") => "5.8 GHz".to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn metric_label(metric: &str) -> &str {
    match metric {
        "noise_dbm" => "Noise",
        "busy_ratio" => "Occupancy",
        "scan_p50" => "RSSI p50",
        "scan_p90" => "RSSI p90",
        "scan_p10" => "RSSI p10",
        "hdop" => "HDOP",
        "vdop" => "VDOP",
        "pdop" => "PDOP",
        "cn0_mean" => "C/N₀",
        "sv_used" => "SV used",
        "tec" => "TEC",
        "t_c" => "Temperature",
        "rh_pct" => "Humidity",
        "p_hpa" => "Pressure",
        "mag_norm_ut" => "Magnetometer (µT)",
        other => other,
    }
}

pub fn format_metric_value(value: Option<f64>, metric: &str) -> String {
    let Some(v) = value.filter(|v| !v.is_nan()) else {
        return MISSING.to_string();
    };
    match metric {
        "busy_ratio" => format!("{:.1}%", v * 100.0),
        "noise_dbm" => format!("{:.1} dBm", v),
        m if m.starts_with("scan_") => format!("{:.1} dBm", v),
        "cn0_mean" => format!("{:.1} dB-Hz", v),
        m if m.ends_with("dop") => format!("{:.2}", v),
        "sv_used" => format!("{:.0}", v),
        "tec" => format!("{:.0} TECu", v),
        "mag_norm_ut" => format!("{:.1} µT", v),
        "t_c" => format!("{:.1} °C", v),
        "rh_pct" => format!("{:.1} %", v),
        "p_hpa" => format!("{:.1} hPa", v),
        _ => format!("{:.2}", v),
    }
}
