// Render cache - owns every widget handle and decides create vs. update
use crate::application::widgets::{
    BadgeWidget, GlossaryWidget, LineChartWidget, MapWidget, ModeWidget, TableWidget,
    WidgetFactory,
};
use crate::domain::dashboard::BadgePanel;
use crate::domain::evidence::EvidenceTable;
use crate::domain::query_mode::QueryMode;
use crate::domain::telemetry::{to_chart_points, GlossaryItem};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

pub struct RenderCache {
    factory: Box<dyn WidgetFactory>,
    charts: HashMap<String, Box<dyn LineChartWidget>>,
    badges: HashMap<String, Box<dyn BadgeWidget>>,
    tables: HashMap<String, Box<dyn TableWidget>>,
    glossary: Option<Box<dyn GlossaryWidget>>,
    map: Option<Box<dyn MapWidget>>,
    mode: Option<Box<dyn ModeWidget>>,
}

impl RenderCache {
    pub fn new(factory: Box<dyn WidgetFactory>) -> Self {
        Self {
            factory,
            charts: HashMap::new(),
            badges: HashMap::new(),
            tables: HashMap::new(),
            glossary: None,
            map: None,
            mode: None,
        }
    }

    /// Create the chart on first sight, otherwise replace its dataset in
    /// place. `raw` holds `[timestamp, value]` pairs; pairs with an
    /// unparseable timestamp are dropped. An empty slice clears the chart.
    pub fn upsert_line(&mut self, key: &str, label: &str, raw: &[Vec<Value>]) -> Upsert {
        let points = to_chart_points(raw);

        if let Some(chart) = self.charts.get_mut(key) {
            chart.replace_dataset(points);
            chart.update();
            return Upsert::Updated;
        }

        tracing::debug!(chart = key, points = points.len(), "Creating chart");
        let chart = self.factory.create_line_chart(key, label, points);
        self.charts.insert(key.to_string(), chart);
        Upsert::Created
    }

    pub fn set_badge(&mut self, key: &str, badge: BadgePanel) {
        let factory = &mut self.factory;
        self.badges
            .entry(key.to_string())
            .or_insert_with(|| factory.create_badge(key))
            .set(badge);
    }

    /// Evidence tables are replaced wholesale every cycle.
    pub fn replace_table(&mut self, key: &str, table: EvidenceTable) {
        let factory = &mut self.factory;
        self.tables
            .entry(key.to_string())
            .or_insert_with(|| factory.create_table(key))
            .replace(table);
    }

    /// Fill the glossary panel unless it already has content. Returns
    /// whether it was filled by this call.
    pub fn fill_glossary_once(&mut self, items: Vec<GlossaryItem>) -> bool {
        let factory = &mut self.factory;
        let panel = self
            .glossary
            .get_or_insert_with(|| factory.create_glossary("help-glossary"));
        if panel.is_filled() {
            return false;
        }
        panel.fill(items);
        true
    }

    pub fn map(&mut self) -> &mut dyn MapWidget {
        let factory = &mut self.factory;
        &mut **self.map.get_or_insert_with(|| factory.create_map("map"))
    }

    pub fn show_mode(&mut self, mode: QueryMode) {
        let factory = &mut self.factory;
        self.mode
            .get_or_insert_with(|| factory.create_mode_indicator())
            .show_mode(mode);
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::widgets::recording::{Call, RecordingFactory};
    use crate::domain::severity::classify_index;
    use serde_json::json;

    fn raw(points: &[(&str, f64)]) -> Vec<Vec<Value>> {
        points.iter().map(|(t, v)| vec![json!(t), json!(v)]).collect()
    }

    #[test]
    fn test_first_upsert_creates_then_updates() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        let data = raw(&[("2024-01-01T00:00:00Z", 1.0), ("2024-01-01T00:05:00Z", 2.0)]);

        assert_eq!(cache.upsert_line("tec", "TEC", &data), Upsert::Created);
        assert_eq!(cache.upsert_line("tec", "TEC", &data), Upsert::Updated);
        assert_eq!(cache.chart_count(), 1);

        let calls = factory.calls();
        let creates = calls.iter().filter(|c| matches!(c, Call::CreateChart { .. })).count();
        assert_eq!(creates, 1);
        assert!(calls.contains(&Call::Update { key: "tec".to_string() }));
    }

    #[test]
    fn test_repeated_upsert_is_idempotent() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        let data = raw(&[("2024-01-01T00:00:00Z", 1.0), ("2024-01-01T00:05:00Z", 2.0)]);

        cache.upsert_line("kp", "Kp", &data);
        cache.upsert_line("kp", "Kp", &data);

        let calls = factory.calls();
        let Call::CreateChart { points: created, .. } = &calls[0] else {
            panic!("expected create");
        };
        let Call::ReplaceDataset { points: replaced, .. } = &calls[1] else {
            panic!("expected replace");
        };
        assert_eq!(created, replaced);
        assert_eq!(replaced.len(), 2);
    }

    #[test]
    fn test_bad_timestamps_are_dropped() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        let data = vec![
            vec![json!("bogus"), json!(1.0)],
            vec![json!("2024-01-01T00:00:00Z"), json!(2.0)],
        ];
        cache.upsert_line("hdop", "HDOP", &data);
        let calls = factory.calls();
        let Call::CreateChart { points, .. } = &calls[0] else {
            panic!("expected create");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, Some(2.0));
    }

    #[test]
    fn test_missing_feed_clears_existing_chart() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        cache.upsert_line("vdop", "VDOP", &raw(&[("2024-01-01T00:00:00Z", 1.0)]));
        factory.clear();

        assert_eq!(cache.upsert_line("vdop", "VDOP", &[]), Upsert::Updated);
        assert_eq!(
            factory.calls()[0],
            Call::ReplaceDataset { key: "vdop".to_string(), points: vec![] }
        );
    }

    #[test]
    fn test_glossary_filled_once() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        let items = vec![GlossaryItem {
            field: "kp".to_string(),
            label: "Kp Index".to_string(),
            desc: "Planetary index".to_string(),
        }];
        assert!(cache.fill_glossary_once(items.clone()));
        assert!(!cache.fill_glossary_once(items));
        let fills = factory
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Glossary { .. }))
            .count();
        assert_eq!(fills, 1);
    }

    #[test]
    fn test_map_created_once() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        cache.map();
        cache.map();
        let creates = factory.calls().iter().filter(|c| **c == Call::CreateMap).count();
        assert_eq!(creates, 1);
    }

    #[test]
    fn test_badge_is_reused() {
        let factory = RecordingFactory::default();
        let mut cache = RenderCache::new(Box::new(factory.clone()));
        cache.set_badge("kp-badge", BadgePanel::new("Kp", &classify_index(2.0)));
        cache.set_badge("kp-badge", BadgePanel::new("Kp", &classify_index(6.0)));
        let calls = factory.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], Call::Badge { badge, .. } if badge.text == "Kp: 6.00 (G3)"));
    }
}
