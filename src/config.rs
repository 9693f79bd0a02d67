use config::{Config, ConfigError, File};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default analytics backend location
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Funnel tracked by the dashboard when none is given
pub const DEFAULT_FUNNEL_ID: &str = "onboarding";

/// Application configuration loaded from funnel-watch.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub poller: PollerConfig,
    pub export: ExportConfig,
}

/// Analytics backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub funnel_id: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            funnel_id: DEFAULT_FUNNEL_ID.to_string(),
            timeout_seconds: 30,
        }
    }
}

/// How overlapping poll responses are reconciled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Apply a response only if it belongs to the most recently issued request
    LatestIssued,
    /// Apply any response newer than the last one applied
    #[default]
    Monotonic,
}

/// Polling schedule and scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    pub interval_ms: u64,
    pub include_insights: bool,
    pub sequence_policy: SequencePolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            include_insights: false,
            sequence_policy: SequencePolicy::Monotonic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output_data/exports"),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from funnel-watch.toml and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::read_sources()?;
        config.validate()?;
        Ok(config)
    }

    /// Layer defaults, funnel-watch.toml and environment variables without validating
    ///
    /// Environment variables take precedence over file configuration. A missing
    /// file is fine; a malformed file or environment value is an error.
    pub fn read_sources() -> Result<Self, ConfigError> {
        let api = ApiConfig::default();
        let poller = PollerConfig::default();
        let export = ExportConfig::default();
        let config = Config::builder()
            .set_default("api.base_url", api.base_url)?
            .set_default("api.funnel_id", api.funnel_id)?
            .set_default("api.timeout_seconds", api.timeout_seconds)?
            .set_default("poller.interval_ms", poller.interval_ms)?
            .set_default("poller.include_insights", poller.include_insights)?
            .set_default("poller.sequence_policy", "monotonic")?
            .set_default(
                "export.output_dir",
                export.output_dir.to_string_lossy().to_string(),
            )?
            // Load from funnel-watch.toml if it exists
            .add_source(File::with_name("funnel-watch").required(false))
            // FUNNEL_WATCH_API__BASE_URL, FUNNEL_WATCH_POLLER__INTERVAL_MS, ...
            .add_source(
                config::Environment::with_prefix("FUNNEL_WATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Dashboard-style overrides with custom names
        if let Ok(base_url) = env::var("API_BASE_URL") {
            app_config.api.base_url = base_url;
        }

        if let Ok(funnel_id) = env::var("FUNNEL_ID") {
            app_config.api.funnel_id = funnel_id;
        }

        Ok(app_config)
    }

    /// Reject settings the poller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Message(format!(
                "Invalid api.base_url '{}': {}",
                self.api.base_url, e
            ))
        })?;

        if self.api.funnel_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "api.funnel_id must not be empty".to_string(),
            ));
        }

        if self.poller.interval_ms == 0 {
            return Err(ConfigError::Message(
                "poller.interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
