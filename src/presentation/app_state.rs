// Application state for HTTP handlers
use crate::application::orchestrator::ProgressEvent;
use crate::application::refresh_driver::NavigationCommand;
use crate::infrastructure::board_widgets::SharedBoard;
use tokio::sync::{broadcast, mpsc};

#[derive(Clone)]
pub struct AppState {
    pub board: SharedBoard,
    pub commands: mpsc::Sender<NavigationCommand>,
    pub events: broadcast::Sender<ProgressEvent>,
}
