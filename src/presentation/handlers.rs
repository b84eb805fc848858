// HTTP request handlers
use crate::application::refresh_driver::NavigationCommand;
use crate::domain::dashboard::Dashboard;
use crate::domain::query_mode::QueryMode;
use crate::infrastructure::event_stream::stream_from_subscription;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("invalid day '{0}', expected YYYY-MM-DD")]
    InvalidDay(String),
    #[error("refresh driver is not running")]
    DriverUnavailable,
}

impl IntoResponse for NavigationError {
    fn into_response(self) -> Response {
        let status = match self {
            NavigationError::InvalidDay(_) => StatusCode::BAD_REQUEST,
            NavigationError::DriverUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Deserialize)]
pub struct DayRequest {
    pub day: Option<String>,
}

#[derive(Deserialize)]
pub struct ShiftQuery {
    pub days: i64,
}

/// Empty or missing day clears the selection and returns to live mode.
pub fn mode_for_day(day: Option<&str>) -> Result<QueryMode, NavigationError> {
    match day.map(str::trim) {
        None | Some("") => Ok(QueryMode::Live),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(QueryMode::Historical)
            .map_err(|_| NavigationError::InvalidDay(text.to_string())),
    }
}

async fn navigate(state: &AppState, command: NavigationCommand) -> Result<StatusCode, NavigationError> {
    state
        .commands
        .send(command)
        .await
        .map_err(|_| NavigationError::DriverUnavailable)?;
    tracing::debug!(?command, "Navigation queued");
    Ok(StatusCode::ACCEPTED)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current state of every render target
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    Json(state.board.snapshot())
}

pub async fn set_live(State(state): State<Arc<AppState>>) -> Result<StatusCode, NavigationError> {
    navigate(&state, NavigationCommand::SetMode(QueryMode::Live)).await
}

pub async fn set_day(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DayRequest>,
) -> Result<StatusCode, NavigationError> {
    let mode = mode_for_day(request.day.as_deref())?;
    navigate(&state, NavigationCommand::SetMode(mode)).await
}

/// Previous/next day buttons
pub async fn shift_day(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShiftQuery>,
) -> Result<StatusCode, NavigationError> {
    navigate(&state, NavigationCommand::ShiftDays(query.days)).await
}

/// Progress events of every cycle from now on, as NDJSON
pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_subscription(state.events.subscribe())
}
