use crate::application::console_service::ConsoleSettings;
use crate::domain::sample::{window_capacity, MAX_CAPACITY};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "config/console";
const ENV_PREFIX: &str = "REFLOW_CONSOLE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            request_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetrySettings {
    pub sample_period_ms: u64,
    pub window_secs: u64,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            sample_period_ms: 500,
            window_secs: 300,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelectionSettings {
    pub default_manual_target: f64,
    pub manual_wire_index: i32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            default_manual_target: 25.0,
            manual_wire_index: -1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8081".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.sample_period_ms == 0 {
            return Err(ConfigError::Invalid("telemetry.sample_period_ms must be positive".to_string()));
        }
        if self.telemetry.window_secs.saturating_mul(1000) < self.telemetry.sample_period_ms {
            return Err(ConfigError::Invalid(
                "telemetry.window_secs must cover at least one sample period".to_string(),
            ));
        }
        let capacity = window_capacity(
            Duration::from_millis(self.telemetry.sample_period_ms),
            Duration::from_secs(self.telemetry.window_secs),
        );
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "telemetry window holds {} samples, at most {} allowed",
                capacity, MAX_CAPACITY
            )));
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("backend.request_timeout_ms must be positive".to_string()));
        }
        if !self.selection.default_manual_target.is_finite() {
            return Err(ConfigError::Invalid(
                "selection.default_manual_target must be a finite number".to_string(),
            ));
        }
        let base_url = &self.backend.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url must be an http(s) URL, got {}",
                base_url
            )));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind_addr is not a socket address: {}", self.server.bind_addr))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    pub fn console_settings(&self) -> ConsoleSettings {
        ConsoleSettings {
            sample_period: Duration::from_millis(self.telemetry.sample_period_ms),
            window: Duration::from_secs(self.telemetry.window_secs),
            default_manual_target: self.selection.default_manual_target,
            manual_wire_index: self.selection.manual_wire_index,
        }
    }
}

/// Load `config/console.toml` (optional) overlaid with `REFLOW_CONSOLE__*` variables
pub fn load_console_config() -> Result<ConsoleConfig, ConfigError> {
    load_from(
        config::File::with_name(CONFIG_FILE).required(false),
        environment(),
    )
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_from<S>(file: S, env: config::Environment) -> Result<ConsoleConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    let config: ConsoleConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
