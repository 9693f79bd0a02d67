use super::{emit, parse_format, ApiArgs};
use crate::analysis::{summarize_insights, OutputFormat, ReportFormatter};
use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::types::InsightType;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// AI agent insights, predictions and orchestration
#[derive(Args)]
pub struct InsightsCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format (console, json or csv)
    #[arg(long, default_value = "console", global = true)]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub kind: InsightCommands,
}

/// Insight command types
#[derive(Subcommand)]
pub enum InsightCommands {
    /// Combined insights from every agent
    List {
        /// Only insights of this type (insight, prediction, anomaly, optimization, pattern, ...)
        #[arg(long = "type")]
        insight_type: Option<String>,

        /// Maximum number of insights to return
        #[arg(long)]
        limit: Option<usize>,

        /// Print impact/type counts only
        #[arg(long)]
        summary: bool,
    },
    /// Conversion forecasts from the predictor agent
    Predictions,
    /// Anomalies flagged by the detector agent
    Anomalies,
    /// Optimisation suggestions from the optimizer agent
    Optimizations,
    /// Behavioural patterns found by the pattern agent
    Patterns,
    /// How the agents collaborated on the funnel
    Collaboration,
    /// Trigger a full AI analysis run (POST)
    Analyze,
    /// Status of every AI agent
    Agents,
}

impl InsightsCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        let (config, client) = self.api.connect()?;
        let output = self.render(&client, &config.api.funnel_id, &format).await?;
        emit(&output, &self.output, "Insights report")
    }

    async fn render(
        &self,
        client: &ApiClient,
        funnel_id: &str,
        format: &OutputFormat,
    ) -> AppResult<String> {
        match &self.kind {
            InsightCommands::List {
                insight_type,
                limit,
                summary,
            } => {
                let insight_type = insight_type
                    .as_deref()
                    .map(str::parse::<InsightType>)
                    .transpose()
                    .map_err(AppError::InvalidData)?;
                let response = client.fetch_insights(funnel_id, insight_type, *limit).await?;
                if *summary {
                    ReportFormatter::format_insight_summary(&summarize_insights(&response), format)
                } else {
                    ReportFormatter::format_insights("AI insights", &response, format)
                }
            }
            InsightCommands::Predictions => {
                let response = client.fetch_predictions(funnel_id).await?;
                ReportFormatter::format_insights("Predictions", &response, format)
            }
            InsightCommands::Anomalies => {
                let response = client.fetch_anomalies(funnel_id).await?;
                ReportFormatter::format_insights("Anomalies", &response, format)
            }
            InsightCommands::Optimizations => {
                let response = client.fetch_optimizations(funnel_id).await?;
                ReportFormatter::format_insights("Optimizations", &response, format)
            }
            InsightCommands::Patterns => {
                let response = client.fetch_patterns(funnel_id).await?;
                ReportFormatter::format_insights("Patterns", &response, format)
            }
            InsightCommands::Collaboration => {
                let report = client.fetch_collaboration_report(funnel_id).await?;
                ReportFormatter::format_collaboration_report(&report, format)
            }
            InsightCommands::Analyze => {
                let response = client.trigger_analysis(funnel_id).await?;
                ReportFormatter::format_analysis_trigger(&response, format)
            }
            InsightCommands::Agents => {
                let response = client.fetch_agent_status().await?;
                ReportFormatter::format_agent_status(&response, format)
            }
        }
    }
}
