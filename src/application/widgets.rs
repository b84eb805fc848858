// Render target traits - the widget operations the refresh engine relies on
//
// The host environment supplies the concrete widgets through a
// `WidgetFactory`; the engine only ever creates them, replaces their
// content, or moves their view.
use crate::domain::dashboard::{BadgePanel, GeoBounds, GeoPoint};
use crate::domain::evidence::EvidenceTable;
use crate::domain::query_mode::QueryMode;
use crate::domain::telemetry::{GlossaryItem, TimeSeriesPoint};

pub trait LineChartWidget: Send {
    /// Swap the whole dataset. Does not redraw.
    fn replace_dataset(&mut self, points: Vec<TimeSeriesPoint>);

    /// Minimal redraw after a dataset change.
    fn update(&mut self);
}

pub trait BadgeWidget: Send {
    fn set(&mut self, badge: BadgePanel);
}

pub trait TableWidget: Send {
    fn replace(&mut self, table: EvidenceTable);
}

pub trait GlossaryWidget: Send {
    fn is_filled(&self) -> bool;
    fn fill(&mut self, items: Vec<GlossaryItem>);
}

pub trait MapWidget: Send {
    fn set_marker(&mut self, position: GeoPoint);
    fn set_trail(&mut self, trail: Vec<GeoPoint>);
    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
}

/// Mode indicator (day picker and its label).
pub trait ModeWidget: Send {
    fn show_mode(&mut self, mode: QueryMode);
}

/// Loading overlay. Shared with the debounce timer task, hence `Sync`.
pub trait OverlayWidget: Send + Sync {
    fn reset(&self, title: &str, subtitle: &str, first_line: &str);
    fn append(&self, line: &str);
    fn show(&self);
    fn hide(&self);
}

pub trait WidgetFactory: Send {
    fn create_line_chart(
        &mut self,
        key: &str,
        label: &str,
        points: Vec<TimeSeriesPoint>,
    ) -> Box<dyn LineChartWidget>;
    fn create_badge(&mut self, key: &str) -> Box<dyn BadgeWidget>;
    fn create_table(&mut self, key: &str) -> Box<dyn TableWidget>;
    fn create_glossary(&mut self, key: &str) -> Box<dyn GlossaryWidget>;
    fn create_map(&mut self, key: &str) -> Box<dyn MapWidget>;
    fn create_mode_indicator(&mut self) -> Box<dyn ModeWidget>;
}

#[cfg(test)]
pub(crate) mod recording {
    //! Widgets that record every call, for tests.
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        CreateChart { key: String, points: Vec<TimeSeriesPoint> },
        ReplaceDataset { key: String, points: Vec<TimeSeriesPoint> },
        Update { key: String },
        Badge { key: String, badge: BadgePanel },
        Table { key: String, table: EvidenceTable },
        Glossary { items: Vec<GlossaryItem> },
        Marker(GeoPoint),
        Trail(Vec<GeoPoint>),
        FitBounds(GeoBounds, u32),
        SetView(GeoPoint, u8),
        Mode(QueryMode),
        CreateMap,
    }

    pub(crate) type CallLog = Arc<Mutex<Vec<Call>>>;

    #[derive(Default, Clone)]
    pub(crate) struct RecordingFactory {
        pub calls: CallLog,
    }

    impl RecordingFactory {
        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn clear(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    struct Recorder {
        key: String,
        calls: CallLog,
        filled: bool,
    }

    impl Recorder {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl LineChartWidget for Recorder {
        fn replace_dataset(&mut self, points: Vec<TimeSeriesPoint>) {
            self.record(Call::ReplaceDataset { key: self.key.clone(), points });
        }
        fn update(&mut self) {
            self.record(Call::Update { key: self.key.clone() });
        }
    }

    impl BadgeWidget for Recorder {
        fn set(&mut self, badge: BadgePanel) {
            self.record(Call::Badge { key: self.key.clone(), badge });
        }
    }

    impl TableWidget for Recorder {
        fn replace(&mut self, table: EvidenceTable) {
            self.record(Call::Table { key: self.key.clone(), table });
        }
    }

    impl GlossaryWidget for Recorder {
        fn is_filled(&self) -> bool {
            self.filled
        }
        fn fill(&mut self, items: Vec<GlossaryItem>) {
            self.filled = true;
            self.record(Call::Glossary { items });
        }
    }

    impl MapWidget for Recorder {
        fn set_marker(&mut self, position: GeoPoint) {
            self.record(Call::Marker(position));
        }
        fn set_trail(&mut self, trail: Vec<GeoPoint>) {
            self.record(Call::Trail(trail));
        }
        fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
            self.record(Call::FitBounds(bounds, padding_px));
        }
        fn set_view(&mut self, center: GeoPoint, zoom: u8) {
            self.record(Call::SetView(center, zoom));
        }
    }

    impl ModeWidget for Recorder {
        fn show_mode(&mut self, mode: QueryMode) {
            self.record(Call::Mode(mode));
        }
    }

    impl RecordingFactory {
        fn recorder(&self, key: &str) -> Recorder {
            Recorder {
                key: key.to_string(),
                calls: self.calls.clone(),
                filled: false,
            }
        }
    }

    impl WidgetFactory for RecordingFactory {
        fn create_line_chart(
            &mut self,
            key: &str,
            _label: &str,
            points: Vec<TimeSeriesPoint>,
        ) -> Box<dyn LineChartWidget> {
            self.calls.lock().unwrap().push(Call::CreateChart {
                key: key.to_string(),
                points,
            });
            Box::new(self.recorder(key))
        }
        fn create_badge(&mut self, key: &str) -> Box<dyn BadgeWidget> {
            Box::new(self.recorder(key))
        }
        fn create_table(&mut self, key: &str) -> Box<dyn TableWidget> {
            Box::new(self.recorder(key))
        }
        fn create_glossary(&mut self, key: &str) -> Box<dyn GlossaryWidget> {
            Box::new(self.recorder(key))
        }
        fn create_map(&mut self, key: &str) -> Box<dyn MapWidget> {
            self.calls.lock().unwrap().push(Call::CreateMap);
            Box::new(self.recorder(key))
        }
        fn create_mode_indicator(&mut self) -> Box<dyn ModeWidget> {
            Box::new(self.recorder("mode"))
        }
    }
}
