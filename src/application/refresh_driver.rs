// Refresh cycle driver - owns the session and runs one cycle at a time
use crate::application::dashboard_service::{render_results, RenderSettings};
use crate::application::feed_catalog::{FeedDescriptor, CATALOG};
use crate::application::feed_source::FeedSource;
use crate::application::orchestrator::{fetch_all, FetchResults, ProgressEvent};
use crate::application::overlay::LoadingOverlay;
use crate::application::render_cache::RenderCache;
use crate::domain::query_mode::{resolve, LiveWindows, QueryMode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

/// User navigation, sent from the host to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    SetMode(QueryMode),
    ShiftDays(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub refresh_interval: Duration,
    pub live_windows: LiveWindows,
    pub render: RenderSettings,
}

/// Process-wide session state. Built once at startup and only mutated by
/// the driver.
pub struct Session {
    pub mode: QueryMode,
    pub cache: RenderCache,
    pub overlay: LoadingOverlay,
    cycle_seq: u64,
}

impl Session {
    pub fn new(mode: QueryMode, cache: RenderCache, overlay: LoadingOverlay) -> Self {
        Self {
            mode,
            cache,
            overlay,
            cycle_seq: 0,
        }
    }

    fn next_cycle(&mut self) -> u64 {
        self.cycle_seq += 1;
        self.cycle_seq
    }

    pub fn apply(&mut self, command: NavigationCommand) {
        self.mode = match command {
            NavigationCommand::SetMode(mode) => mode,
            NavigationCommand::ShiftDays(days) => self.mode.shifted(days),
        };
        self.cache.show_mode(self.mode);
        tracing::info!(mode = ?self.mode, "Mode changed");
    }
}

enum CycleEnd {
    Rendered(u64),
    Interrupted(Option<NavigationCommand>),
}

pub struct RefreshDriver {
    source: Arc<dyn FeedSource>,
    catalog: &'static [FeedDescriptor],
    session: Session,
    config: DriverConfig,
    events: broadcast::Sender<ProgressEvent>,
}

fn publish(overlay: &LoadingOverlay, events: &broadcast::Sender<ProgressEvent>, event: ProgressEvent) {
    overlay.record(&event);
    // No subscribers is fine.
    let _ = events.send(event);
}

impl RefreshDriver {
    pub fn new(
        source: Arc<dyn FeedSource>,
        session: Session,
        config: DriverConfig,
        events: broadcast::Sender<ProgressEvent>,
    ) -> Self {
        Self {
            source,
            catalog: CATALOG,
            session,
            config,
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until the command channel closes: a cycle on every interval tick
    /// and immediately after every navigation command.
    pub async fn run(mut self, mut commands: mpsc::Receiver<NavigationCommand>) {
        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.session.cache.show_mode(self.session.mode);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                command = commands.recv() => match command {
                    Some(command) => self.session.apply(command),
                    None => break,
                },
            }
            if !self.refresh(&mut commands).await {
                break;
            }
        }
        tracing::info!("Navigation channel closed, refresh driver stopping");
    }

    /// Run cycles until one completes. A navigation command arriving while
    /// feeds are in flight abandons the current cycle and starts a new one
    /// for the new mode. Returns false once the command channel is closed.
    pub async fn refresh(&mut self, commands: &mut mpsc::Receiver<NavigationCommand>) -> bool {
        loop {
            match self.run_cycle(commands).await {
                CycleEnd::Rendered(_) => return true,
                CycleEnd::Interrupted(Some(command)) => self.session.apply(command),
                CycleEnd::Interrupted(None) => return false,
            }
        }
    }

    async fn run_cycle(&mut self, commands: &mut mpsc::Receiver<NavigationCommand>) -> CycleEnd {
        let cycle = self.session.next_cycle();
        let mode = self.session.mode;
        let span = tracing::info_span!("refresh", cycle, mode = ?mode);
        let params = resolve(&mode, self.config.live_windows);

        let (title, subtitle) = match mode.day() {
            Some(day) => (format!("Loading history for {}", day), "Reading archive…"),
            None => ("Loading live data".to_string(), "Reading latest window…"),
        };
        self.session.overlay.cycle_start(&title, subtitle);
        publish(&self.session.overlay, &self.events, ProgressEvent::CycleStart { cycle, mode });
        self.session.overlay.note("Requests sent…");

        let overlay = &self.session.overlay;
        let events = &self.events;
        let results = tokio::select! {
            results = fetch_all(
                self.source.as_ref(),
                self.catalog,
                &params,
                cycle,
                |event| publish(overlay, events, event),
            ).instrument(span.clone()) => results,
            command = commands.recv() => {
                tracing::info!(parent: &span, "Cycle abandoned by navigation");
                self.finish(cycle, None);
                return CycleEnd::Interrupted(command);
            }
        };

        let _entered = span.enter();
        let outcome = render_results(&results, &mut self.session.cache, self.config.render);
        tracing::info!(
            feeds = results.len(),
            failed = results.failed_count(),
            map = ?outcome,
            "Cycle rendered"
        );
        self.finish(cycle, Some(&results));
        CycleEnd::Rendered(cycle)
    }

    fn finish(&self, cycle: u64, results: Option<&FetchResults>) {
        let failed = results.map(FetchResults::failed_count).unwrap_or(0);
        self.session.overlay.cycle_end();
        publish(&self.session.overlay, &self.events, ProgressEvent::CycleEnd { cycle, failed });
    }
}
