use super::{emit, parse_format, ApiArgs};
use crate::analysis::ReportFormatter;
use crate::errors::AppResult;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Segments, cohorts, session replays and the combined analytics report
#[derive(Args)]
pub struct AnalyticsCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format (console or json)
    #[arg(long, default_value = "console", global = true)]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub kind: AnalyticsCommands,
}

/// Analytics command types
#[derive(Subcommand)]
pub enum AnalyticsCommands {
    /// Behavioural user segments
    Segments {
        /// Days of history to segment
        #[arg(long)]
        lookback_days: Option<u32>,
    },
    /// Monthly cohort retention
    Cohorts {
        /// Number of monthly cohorts
        #[arg(long)]
        months_back: Option<u32>,
    },
    /// Reconstructed user sessions
    Sessions {
        /// Maximum number of sessions
        #[arg(long)]
        limit: Option<usize>,

        /// Only sessions that dropped off before converting
        #[arg(long)]
        dropped_only: bool,
    },
    /// AI predictions per segment
    Predictive,
    /// Segments, cohorts, sessions and predictions in one report
    Report,
}

impl AnalyticsCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        let (config, client) = self.api.connect()?;
        let funnel_id = &config.api.funnel_id;

        let output = match &self.kind {
            AnalyticsCommands::Segments { lookback_days } => {
                let response = client.fetch_segments(funnel_id, *lookback_days).await?;
                ReportFormatter::format_segments(&response, &format)?
            }
            AnalyticsCommands::Cohorts { months_back } => {
                let response = client.fetch_cohorts(funnel_id, *months_back).await?;
                ReportFormatter::format_cohorts(&response, &format)?
            }
            AnalyticsCommands::Sessions {
                limit,
                dropped_only,
            } => {
                let filter = dropped_only.then_some(true);
                let response = client
                    .fetch_session_replays(funnel_id, *limit, filter)
                    .await?;
                ReportFormatter::format_session_replays(&response, &format)?
            }
            AnalyticsCommands::Predictive => {
                let response = client.fetch_predictive_insights(funnel_id).await?;
                ReportFormatter::format_predictive_insights(&response, &format)?
            }
            AnalyticsCommands::Report => {
                let response = client.fetch_comprehensive_report(funnel_id).await?;
                ReportFormatter::format_comprehensive_report(&response, &format)?
            }
        };

        emit(&output, &self.output, "Analytics report")
    }
}
