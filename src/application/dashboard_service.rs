// Dashboard service - applies one cycle's results to the render targets
use crate::application::feed_catalog::CHARTS;
use crate::application::map_updater::{update_map, MapOutcome};
use crate::application::orchestrator::FetchResults;
use crate::application::render_cache::RenderCache;
use crate::domain::dashboard::BadgePanel;
use crate::domain::evidence::build_evidence_table;
use crate::domain::severity::{classify_density, classify_index, BadgeStyle, UNKNOWN_LABEL};
use crate::domain::telemetry::{
    decode, GlossaryResponse, LatestResponse, SeriesResponse, SummaryResponse, TrackResponse,
};

pub const EVIDENCE_TABLE: &str = "ev-table";
pub const KP_BADGE: &str = "kp-badge";
pub const TEC_BADGE: &str = "tec-badge";
pub const POSITION_BADGE: &str = "pos-badge";

const NEUTRAL_BACKGROUND: &str = "#eef6ff";
const NEUTRAL_FOREGROUND: &str = "#111";

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub alarm_threshold: f64,
}

/// Render a complete result map. Feeds that failed render as "no data".
pub fn render_results(
    results: &FetchResults,
    cache: &mut RenderCache,
    settings: RenderSettings,
) -> MapOutcome {
    let summary: SummaryResponse = decode(results.payload("summary"));
    let latest = decode::<LatestResponse>(results.payload("latest"))
        .latest
        .unwrap_or_default();

    cache.replace_table(
        EVIDENCE_TABLE,
        build_evidence_table(&summary.evidence, settings.alarm_threshold),
    );

    let kp = summary
        .summary
        .as_ref()
        .and_then(|s| s.kplast)
        .unwrap_or(f64::NAN);
    cache.set_badge(KP_BADGE, BadgePanel::new("Kp", &classify_index(kp)));

    cache.set_badge(TEC_BADGE, tec_badge(latest.tec, latest.tec_source.as_deref()));

    let fix = latest.fix_label().unwrap_or_else(|| UNKNOWN_LABEL.to_string());
    cache.set_badge(POSITION_BADGE, position_badge(latest.lat, latest.lon, &fix));

    let glossary: GlossaryResponse = decode(results.payload("glossary"));
    if let Some(items) = glossary.items.filter(|items| !items.is_empty()) {
        if cache.fill_glossary_once(items) {
            tracing::debug!("Glossary filled");
        }
    }

    for chart in CHARTS {
        let series: SeriesResponse = decode(results.payload(chart.feed));
        cache.upsert_line(chart.key, chart.label, &series.points);
    }

    let track: TrackResponse = decode(results.payload("track"));
    let fallback = latest.lat.zip(latest.lon);
    update_map(cache.map(), &track.points, fallback)
}

fn tec_badge(tec: Option<f64>, source: Option<&str>) -> BadgePanel {
    let source = source.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_LABEL);
    let style = classify_density(tec.unwrap_or(f64::NAN));
    BadgePanel {
        text: format!("TEC: {} ({})", style.label, source),
        background: style.background,
        foreground: style.foreground,
    }
}

fn position_badge(lat: Option<f64>, lon: Option<f64>, fix: &str) -> BadgePanel {
    let text = match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
            format!("{:.5}, {:.5} ({})", lat, lon, fix)
        }
        _ => format!("{} ({})", UNKNOWN_LABEL, fix),
    };
    BadgePanel::new(
        "Pos",
        &BadgeStyle {
            background: NEUTRAL_BACKGROUND,
            foreground: NEUTRAL_FOREGROUND,
            label: text,
        },
    )
}
