// Dashboard page model - what the render targets currently show
use super::evidence::EvidenceTable;
use super::query_mode::QueryMode;
use super::severity::BadgeStyle;
use super::telemetry::{GlossaryItem, TimeSeriesPoint};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    pub fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = GeoBounds {
            south_west: *first,
            north_east: *first,
        };
        Some(points.iter().fold(init, |b, p| GeoBounds {
            south_west: GeoPoint::new(b.south_west.lat.min(p.lat), b.south_west.lon.min(p.lon)),
            north_east: GeoPoint::new(b.north_east.lat.max(p.lat), b.north_east.lon.max(p.lon)),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    FitBounds { bounds: GeoBounds, padding_px: u32 },
    Center { center: GeoPoint, zoom: u8 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapPanel {
    pub marker: Option<GeoPoint>,
    pub trail: Vec<GeoPoint>,
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub label: String,
    pub points: Vec<TimeSeriesPoint>,
    /// Number of dataset replacements since the chart was created.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgePanel {
    pub text: String,
    pub background: &'static str,
    pub foreground: &'static str,
}

impl BadgePanel {
    pub fn new(prefix: &str, style: &BadgeStyle) -> Self {
        Self {
            text: format!("{}: {}", prefix, style.label),
            background: style.background,
            foreground: style.foreground,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlossaryPanel {
    pub filled: bool,
    pub items: Vec<GlossaryItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayPanel {
    pub visible: bool,
    pub title: String,
    pub subtitle: String,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub mode: QueryMode,
    pub mode_label: String,
    pub charts: BTreeMap<String, ChartPanel>,
    pub badges: BTreeMap<String, BadgePanel>,
    pub evidence: Option<EvidenceTable>,
    pub map: Option<MapPanel>,
    pub glossary: GlossaryPanel,
    pub overlay: OverlayPanel,
}

impl Dashboard {
    pub fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            mode_label: mode.label(),
            charts: BTreeMap::new(),
            badges: BTreeMap::new(),
            evidence: None,
            map: None,
            glossary: GlossaryPanel::default(),
            overlay: OverlayPanel::default(),
        }
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
        self.mode_label = mode.label();
    }
}
