use super::{emit, parse_format, ApiArgs};
use crate::analysis::ReportFormatter;
use crate::errors::{AppError, AppResult};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info};

/// Check that the analytics backend is reachable and healthy
#[derive(Args)]
pub struct HealthCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Also list the event types PostHog has recorded
    #[arg(long)]
    pub events: bool,

    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl HealthCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        let (config, client) = self.api.connect()?;
        info!("Checking backend at {}", config.api.base_url);

        let health = match client.fetch_health().await {
            Ok(health) => health,
            Err(e) => {
                error!("Health check failed: {}", e);
                println!("Backend health check FAILED");
                println!("Error: {}", e);
                println!("\nTroubleshooting tips:");
                println!("1. Check that the analytics backend is running");
                println!("2. Verify the base URL ({}) is correct", config.api.base_url);
                println!("3. Set API_BASE_URL or pass --base-url to point elsewhere");
                return Err(e.into());
            }
        };

        let mut output = ReportFormatter::format_health(&health, &format)?;
        if self.events {
            let events = client.fetch_posthog_events().await?;
            output.push('\n');
            output.push_str(&ReportFormatter::format_posthog_events(&events, &format)?);
        }
        emit(&output, &self.output, "Health report")?;

        if !health.is_ok() {
            return Err(AppError::InvalidData(format!(
                "Backend reported status '{}'",
                health.status
            )));
        }
        Ok(())
    }
}
