// Loading overlay - debounced show/hide driven by cycle progress
use crate::application::orchestrator::ProgressEvent;
use crate::application::widgets::OverlayWidget;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_SHOW_DELAY: Duration = Duration::from_millis(400);
const FIRST_LINE: &str = "Starting…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    /// Timer armed, overlay not yet visible.
    PendingShow,
    Visible,
}

struct Inner {
    state: OverlayState,
    /// Bumped on every arm so a stale timer cannot show the overlay.
    generation: u64,
}

pub struct LoadingOverlay {
    inner: Arc<Mutex<Inner>>,
    widget: Arc<dyn OverlayWidget>,
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LoadingOverlay {
    pub fn new(widget: Arc<dyn OverlayWidget>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: OverlayState::Hidden,
                generation: 0,
            })),
            widget,
            delay,
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> OverlayState {
        lock(&self.inner).state
    }

    /// Reset the log and, unless already visible, arm the show timer.
    pub fn cycle_start(&self, title: &str, subtitle: &str) {
        self.widget.reset(title, subtitle, FIRST_LINE);

        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state == OverlayState::Visible {
                return;
            }
            inner.state = OverlayState::PendingShow;
            inner.generation += 1;
            inner.generation
        };

        let inner = self.inner.clone();
        let widget = self.widget.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = lock(&inner);
            if inner.state == OverlayState::PendingShow && inner.generation == generation {
                inner.state = OverlayState::Visible;
                widget.show();
            }
        });

        if let Some(previous) = lock(&self.timer).replace(handle) {
            previous.abort();
        }
    }

    /// Append a progress line while a log is active.
    pub fn record(&self, event: &ProgressEvent) {
        let Some(line) = event.log_line() else {
            return;
        };
        if self.state() != OverlayState::Hidden {
            self.widget.append(&line);
        }
    }

    pub fn note(&self, line: &str) {
        if self.state() != OverlayState::Hidden {
            self.widget.append(line);
        }
    }

    /// Cancel a pending show and hide, whatever the cycle's outcome.
    pub fn cycle_end(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
        let mut inner = lock(&self.inner);
        if inner.state == OverlayState::Visible {
            self.widget.hide();
        }
        inner.state = OverlayState::Hidden;
    }
}
