// In-memory widgets backed by the shared dashboard board served over HTTP
use crate::application::widgets::{
    BadgeWidget, GlossaryWidget, LineChartWidget, MapWidget, ModeWidget, OverlayWidget,
    TableWidget, WidgetFactory,
};
use crate::domain::dashboard::{
    BadgePanel, ChartPanel, Dashboard, GeoBounds, GeoPoint, MapPanel, Viewport,
};
use crate::domain::evidence::EvidenceTable;
use crate::domain::query_mode::QueryMode;
use crate::domain::telemetry::{GlossaryItem, TimeSeriesPoint};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The page: every widget writes its visible state here.
#[derive(Clone)]
pub struct SharedBoard(Arc<RwLock<Dashboard>>);

impl SharedBoard {
    pub fn new(mode: QueryMode) -> Self {
        Self(Arc::new(RwLock::new(Dashboard::new(mode))))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Dashboard> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Dashboard> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Dashboard {
        self.read().clone()
    }
}

pub struct BoardWidgets {
    board: SharedBoard,
}

impl BoardWidgets {
    pub fn new(board: SharedBoard) -> Self {
        Self { board }
    }
}

struct BoardChart {
    key: String,
    board: SharedBoard,
    pending: Option<Vec<TimeSeriesPoint>>,
}

impl LineChartWidget for BoardChart {
    fn replace_dataset(&mut self, points: Vec<TimeSeriesPoint>) {
        self.pending = Some(points);
    }

    fn update(&mut self) {
        let Some(points) = self.pending.take() else {
            return;
        };
        if let Some(chart) = self.board.write().charts.get_mut(&self.key) {
            chart.points = points;
            chart.revision += 1;
        }
    }
}

struct BoardBadge {
    key: String,
    board: SharedBoard,
}

impl BadgeWidget for BoardBadge {
    fn set(&mut self, badge: BadgePanel) {
        self.board.write().badges.insert(self.key.clone(), badge);
    }
}

struct BoardTable {
    board: SharedBoard,
}

impl TableWidget for BoardTable {
    fn replace(&mut self, table: EvidenceTable) {
        self.board.write().evidence = Some(table);
    }
}

struct BoardGlossary {
    board: SharedBoard,
}

impl GlossaryWidget for BoardGlossary {
    fn is_filled(&self) -> bool {
        self.board.read().glossary.filled
    }

    fn fill(&mut self, items: Vec<GlossaryItem>) {
        let mut board = self.board.write();
        board.glossary.items = items;
        board.glossary.filled = true;
    }
}

struct BoardMap {
    board: SharedBoard,
}

impl BoardMap {
    fn with_panel(&self, f: impl FnOnce(&mut MapPanel)) {
        let mut board = self.board.write();
        f(board.map.get_or_insert_with(MapPanel::default));
    }
}

impl MapWidget for BoardMap {
    fn set_marker(&mut self, position: GeoPoint) {
        self.with_panel(|map| map.marker = Some(position));
    }

    fn set_trail(&mut self, trail: Vec<GeoPoint>) {
        self.with_panel(|map| map.trail = trail);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        self.with_panel(|map| map.viewport = Some(Viewport::FitBounds { bounds, padding_px }));
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.with_panel(|map| map.viewport = Some(Viewport::Center { center, zoom }));
    }
}

struct BoardMode {
    board: SharedBoard,
}

impl ModeWidget for BoardMode {
    fn show_mode(&mut self, mode: QueryMode) {
        self.board.write().set_mode(mode);
    }
}

/// Loading overlay drawn on the board.
pub struct BoardOverlay {
    board: SharedBoard,
}

impl BoardOverlay {
    pub fn new(board: SharedBoard) -> Self {
        Self { board }
    }
}

impl OverlayWidget for BoardOverlay {
    fn reset(&self, title: &str, subtitle: &str, first_line: &str) {
        let mut board = self.board.write();
        board.overlay.title = title.to_string();
        board.overlay.subtitle = subtitle.to_string();
        board.overlay.log = vec![first_line.to_string()];
    }

    fn append(&self, line: &str) {
        self.board.write().overlay.log.push(line.to_string());
    }

    fn show(&self) {
        self.board.write().overlay.visible = true;
    }

    fn hide(&self) {
        self.board.write().overlay.visible = false;
    }
}

impl WidgetFactory for BoardWidgets {
    fn create_line_chart(
        &mut self,
        key: &str,
        label: &str,
        points: Vec<TimeSeriesPoint>,
    ) -> Box<dyn LineChartWidget> {
        self.board.write().charts.insert(
            key.to_string(),
            ChartPanel {
                label: label.to_string(),
                points,
                revision: 0,
            },
        );
        Box::new(BoardChart {
            key: key.to_string(),
            board: self.board.clone(),
            pending: None,
        })
    }

    fn create_badge(&mut self, key: &str) -> Box<dyn BadgeWidget> {
        Box::new(BoardBadge {
            key: key.to_string(),
            board: self.board.clone(),
        })
    }

    fn create_table(&mut self, _key: &str) -> Box<dyn TableWidget> {
        Box::new(BoardTable {
            board: self.board.clone(),
        })
    }

    fn create_glossary(&mut self, _key: &str) -> Box<dyn GlossaryWidget> {
        Box::new(BoardGlossary {
            board: self.board.clone(),
        })
    }

    fn create_map(&mut self, _key: &str) -> Box<dyn MapWidget> {
        self.board.write().map.get_or_insert_with(MapPanel::default);
        Box::new(BoardMap {
            board: self.board.clone(),
        })
    }

    fn create_mode_indicator(&mut self) -> Box<dyn ModeWidget> {
        Box::new(BoardMode {
            board: self.board.clone(),
        })
    }
}
