use serde::Deserialize;
use std::time::Duration;

use crate::application::dashboard_service::RenderSettings;
use crate::application::refresh_driver::DriverConfig;
use crate::domain::query_mode::LiveWindows;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub base_url: String,
    pub bind_addr: String,
    pub refresh_interval_secs: u64,
    pub overlay_delay_ms: u64,
    pub live_window_minutes: u32,
    pub live_track_minutes: u32,
    pub request_timeout_secs: u64,
    pub evidence_alarm_threshold: f64,
    pub start_live: bool,
}

impl DashboardConfig {
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs.max(1)),
            live_windows: LiveWindows {
                window_minutes: self.live_window_minutes,
                track_minutes: self.live_track_minutes,
            },
            render: RenderSettings {
                alarm_threshold: self.evidence_alarm_threshold,
            },
        }
    }

    pub fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("base_url", "http://127.0.0.1:8088")?
        .set_default("bind_addr", "0.0.0.0:8080")?
        .set_default("refresh_interval_secs", 60)?
        .set_default("overlay_delay_ms", 400)?
        .set_default("live_window_minutes", 4320)?
        .set_default("live_track_minutes", 180)?
        .set_default("request_timeout_secs", 20)?
        .set_default("evidence_alarm_threshold", 3.0)?
        .set_default("start_live", false)
}

/// Defaults, then `config/dashboard.{toml,...}` if present, then
/// `SPACEWX_*` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("SPACEWX"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
