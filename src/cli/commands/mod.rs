pub mod analytics;
pub mod funnel;
pub mod health;
pub mod insights;
pub mod watch;

use crate::analysis::OutputFormat;
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

// ===== Helper Functions =====

/// Backend connection flags shared by every command that talks to the API
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Analytics backend base URL (overrides funnel-watch.toml and API_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Funnel to query (overrides funnel-watch.toml and FUNNEL_ID)
    #[arg(long)]
    pub funnel_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ApiArgs {
    /// Layer the CLI flags over the loaded configuration
    pub fn resolve(&self) -> AppResult<AppConfig> {
        let mut config = AppConfig::read_sources()?;

        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(funnel_id) = &self.funnel_id {
            config.api.funnel_id = funnel_id.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = timeout;
        }

        config.validate()?;
        debug!(
            "Using backend {} for funnel {}",
            config.api.base_url, config.api.funnel_id
        );
        Ok(config)
    }

    /// Resolved configuration plus a client built from it
    pub fn connect(&self) -> AppResult<(AppConfig, ApiClient)> {
        let config = self.resolve()?;
        let client = ApiClient::new(&config.api)?;
        Ok((config, client))
    }
}

/// Parse output format string to OutputFormat enum
pub fn parse_format(format_str: &str) -> AppResult<OutputFormat> {
    match format_str.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        other => Err(AppError::InvalidData(format!(
            "Unknown output format '{}' (expected console, json or csv)",
            other
        ))),
    }
}

/// Write output to file with safe directory creation
pub fn write_output_to_file(path: &Path, content: &str, description: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    println!("{} written to: {}", description, path.display());
    Ok(())
}

/// Print `content`, or write it to `output` when given
pub fn emit(content: &str, output: &Option<PathBuf>, description: &str) -> AppResult<()> {
    match output {
        Some(path) => write_output_to_file(path, content, description),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
