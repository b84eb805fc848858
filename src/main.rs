// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::{get, post}, Router};
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::overlay::LoadingOverlay;
use crate::application::refresh_driver::{RefreshDriver, Session};
use crate::application::render_cache::RenderCache;
use crate::domain::query_mode::QueryMode;
use crate::infrastructure::board_widgets::{BoardOverlay, BoardWidgets, SharedBoard};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_feed_source::HttpFeedSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, set_day, set_live, shift_day, stream_events,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let start_mode = if config.start_live {
        QueryMode::Live
    } else {
        QueryMode::today()
    };

    // Data service client (infrastructure layer)
    let source = Arc::new(HttpFeedSource::new(config.base_url.clone(), config.request_timeout())?);

    // Render targets live on the shared board
    let board = SharedBoard::new(start_mode);
    let session = Session::new(
        start_mode,
        RenderCache::new(Box::new(BoardWidgets::new(board.clone()))),
        LoadingOverlay::new(Arc::new(BoardOverlay::new(board.clone())), config.overlay_delay()),
    );

    // Refresh driver (application layer)
    let (events, _) = broadcast::channel(256);
    let (commands, commands_rx) = mpsc::channel(16);
    let driver = RefreshDriver::new(source, session, config.driver_config(), events.clone());
    tokio::spawn(driver.run(commands_rx));

    let state = Arc::new(AppState {
        board,
        commands,
        events,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/events", get(stream_events))
        .route("/mode/live", post(set_live))
        .route("/mode/day", post(set_day))
        .route("/mode/shift", post(shift_day))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!(%addr, base_url = %config.base_url, mode = ?start_mode, "Starting space-weather dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
