use super::{parse_format, ApiArgs};
use crate::analysis::{OutputFormat, ReportFormatter};
use crate::config::SequencePolicy;
use crate::errors::{AppError, AppResult};
use crate::poller::{DashboardState, FunnelPoller, PollScope};
use chrono::Utc;
use clap::Args;
use std::time::Duration;
use tracing::{info, warn};

/// Poll the funnel on a fixed schedule and print every update
///
/// Fetch failures never stop the watch: they flip the status line to an
/// error and the last good data stays on screen until the next tick.
#[derive(Args)]
pub struct WatchCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Polling interval in milliseconds (overrides poller.interval_ms)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Fetch recommendations and AI insights on every tick as well
    #[arg(long)]
    pub include_insights: bool,

    /// How overlapping responses are reconciled: monotonic (default) or latest-issued
    #[arg(long)]
    pub policy: Option<String>,

    /// Stop after this many completed requests (default: run until Ctrl-C)
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    pub format: String,
}

fn parse_policy(raw: &str) -> AppResult<SequencePolicy> {
    match raw.to_lowercase().replace('_', "-").as_str() {
        "latest-issued" | "latest" => Ok(SequencePolicy::LatestIssued),
        "monotonic" => Ok(SequencePolicy::Monotonic),
        other => Err(AppError::Config(format!(
            "Unknown sequence policy '{}' (expected latest-issued or monotonic)",
            other
        ))),
    }
}

/// Requests that have finished, applied or not
fn completed(state: &DashboardState) -> u64 {
    state.successes + state.failures + state.discarded
}

impl WatchCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        if format == OutputFormat::Csv {
            return Err(AppError::InvalidData(
                "watch supports console or json output".to_string(),
            ));
        }

        let (mut config, client) = self.api.connect()?;
        if let Some(interval_ms) = self.interval_ms {
            config.poller.interval_ms = interval_ms;
        }
        if self.include_insights {
            config.poller.include_insights = true;
        }
        if let Some(policy) = &self.policy {
            config.poller.sequence_policy = parse_policy(policy)?;
        }
        config.validate()?;

        let poller = FunnelPoller::new(
            client,
            config.api.funnel_id.clone(),
            PollScope::from_flag(config.poller.include_insights),
            config.poller.sequence_policy,
        );
        let mut updates = poller.subscribe();
        poller.start_polling(Duration::from_millis(config.poller.interval_ms))?;
        info!(
            "Watching funnel {} at {} (Ctrl-C to stop)",
            config.api.funnel_id, config.api.base_url
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        warn!("State channel closed, stopping watch");
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    let rendered = ReportFormatter::format_dashboard_state(&state, Utc::now(), &format)?;
                    println!("{}", rendered);

                    if self.ticks.is_some_and(|max| completed(&state) >= max) {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    println!("Stopping watch");
                    break;
                }
            }
        }

        poller.stop_polling();
        Ok(())
    }
}
