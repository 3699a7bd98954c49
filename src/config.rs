use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_COLLECTION_PATH: &str = "/suppliers";
pub const DEFAULT_USER_AGENT: &str = concat!("supplier-console/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub collection_path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub user_agent: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// Loads `config/default.{yaml,...}` when present, then `APP__*` overrides.
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            Self::defaults()?.add_source(config::File::with_name("config/default").required(false)),
        )
    }

    /// Same layering as [`Settings::new`], reading a specific file instead.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(Self::defaults()?.add_source(config::File::from(path.as_ref())))
    }

    /// Settings pointing at `base_url` with everything else defaulted.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .set_override("api.base_url", base_url)?
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.collection_path", DEFAULT_COLLECTION_PATH)?
            .set_default("api.user_agent", DEFAULT_USER_AGENT)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Reports the effective settings. Settings pick the log level, so this
    /// runs once a subscriber is installed.
    pub fn log_summary(&self) {
        debug!(
            header_count = self.api.headers.len(),
            headers = ?self.api.headers.keys().collect::<Vec<_>>(),
            "Loaded API headers from configuration"
        );

        debug!(
            base_url = %self.api.base_url,
            collection_path = %self.api.collection_path,
            user_agent = %self.api.user_agent,
            timeout_secs = ?self.api.timeout_secs,
            log_level = %self.logging.level,
            "Parsed API settings"
        );
    }
}
