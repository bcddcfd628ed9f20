use crate::application::time_series::LabelClock;
use crate::domain::gauge::DEFAULT_GAUGE_MAX_WATTS;
use anyhow::{Context, bail};
use chrono::FixedOffset;
use serde::Deserialize;
use std::net::SocketAddr;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "SOLAR_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub gauge: GaugeSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub static_dir: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthSettings {
    pub shared_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    #[serde(default = "default_current_path")]
    pub current_path: String,
    #[serde(default = "default_today_path")]
    pub today_path: String,
    #[serde(default = "default_yearly_path")]
    pub yearly_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GaugeSettings {
    #[serde(default = "default_gauge_max")]
    pub max_watts: f64,
}

impl Default for GaugeSettings {
    fn default() -> Self {
        Self {
            max_watts: default_gauge_max(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplaySettings {
    /// Fixed offset for chart labels; host local time when unset.
    pub utc_offset_minutes: Option<i32>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_current_path() -> String {
    "/current".to_owned()
}

fn default_today_path() -> String {
    "/today".to_owned()
}

fn default_yearly_path() -> String {
    "/yearly".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_gauge_max() -> f64 {
    DEFAULT_GAUGE_MAX_WATTS
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.upstream.base_url.trim().is_empty() {
            bail!("upstream.base_url must not be empty");
        }
        if !(self.gauge.max_watts.is_finite() && self.gauge.max_watts > 0.0) {
            bail!("gauge.max_watts must be positive, got {}", self.gauge.max_watts);
        }
        if self.upstream.timeout_secs == 0 {
            bail!("upstream.timeout_secs must be at least 1");
        }
        if matches!(&self.auth.shared_secret, Some(secret) if secret.is_empty()) {
            bail!("auth.shared_secret must not be empty when set");
        }
        self.label_clock()?;
        Ok(())
    }

    pub fn label_clock(&self) -> anyhow::Result<LabelClock> {
        match self.display.utc_offset_minutes {
            None => Ok(LabelClock::Local),
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(LabelClock::Fixed)
                .with_context(|| format!("display.utc_offset_minutes out of range: {}", minutes)),
        }
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid listen address {}:{}",
                    self.server.bind_address, self.server.port
                )
            })
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `SOLAR_DASHBOARD__*` variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
