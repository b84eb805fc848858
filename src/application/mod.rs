// Application layer - refresh orchestration and rendering
pub mod dashboard_service;
pub mod feed_catalog;
pub mod feed_source;
pub mod map_updater;
pub mod orchestrator;
pub mod overlay;
pub mod refresh_driver;
pub mod render_cache;
pub mod widgets;
