use super::{emit, parse_format, ApiArgs};
use crate::analysis::{
    compute_funnel_analysis, derive_recommendations, summarize_funnel, ReportFormatter,
};
use crate::export::{
    create_export_file, export_file_path, read_step_counts_csv, write_funnel_csv,
    write_insights_csv,
};
use crate::errors::AppResult;
use crate::types::InsightCollection;
use chrono::Utc;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

/// Fetch and display the funnel analysis
#[derive(Args)]
pub struct FunnelCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Show only the headline summary
    #[arg(long)]
    pub summary: bool,

    /// Output format (console, json or csv)
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl FunnelCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        let (config, client) = self.api.connect()?;
        let result = client.fetch_funnel(&config.api.funnel_id).await?;

        let output = if self.summary {
            ReportFormatter::format_funnel_summary(&summarize_funnel(&result), &format)?
        } else {
            ReportFormatter::format_funnel(&result, &format)?
        };
        emit(&output, &self.output, "Funnel report")
    }
}

/// Export the funnel (and optionally AI insights) to CSV files
#[derive(Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Also export the current AI insights
    #[arg(long)]
    pub insights: bool,

    /// Funnel CSV path (default: <export.output_dir>/<funnel>_funnel_<timestamp>.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Directory for generated file names (overrides export.output_dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl ExportCommand {
    pub async fn run(&self) -> AppResult<()> {
        let (config, client) = self.api.connect()?;
        let funnel_id = &config.api.funnel_id;
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| config.export.output_dir.clone());
        let now = Utc::now();

        let result = client.fetch_funnel(funnel_id).await?;
        let funnel_path = self
            .output
            .clone()
            .unwrap_or_else(|| export_file_path(&dir, funnel_id, "funnel", now));
        let rows = write_funnel_csv(&result, create_export_file(&funnel_path)?)?;
        println!("Funnel export ({} steps) written to: {}", rows, funnel_path.display());

        if self.insights {
            let insights = client.fetch_insights(funnel_id, None, None).await?;
            let insights_path = export_file_path(&dir, funnel_id, "insights", now);
            let rows = write_insights_csv(insights.items(), create_export_file(&insights_path)?)?;
            println!(
                "Insights export ({} rows) written to: {}",
                rows,
                insights_path.display()
            );
        }

        Ok(())
    }
}

/// Compute a funnel analysis offline from a `name,count` CSV
#[derive(Args)]
pub struct ComputeCommand {
    /// Step counts CSV (header `name,count`, rows in funnel order)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Funnel id to label the result with
    #[arg(long, default_value = crate::config::DEFAULT_FUNNEL_ID)]
    pub funnel_id: String,

    /// Also derive recommendations from the computed funnel
    #[arg(long)]
    pub recommendations: bool,

    /// Output format (console, json or csv)
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl ComputeCommand {
    pub fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        info!("Reading step counts from {}", self.input.display());
        let file = File::open(&self.input)?;
        let steps = read_step_counts_csv(BufReader::new(file))?;

        let data_source = format!("CSV ({})", self.input.display());
        let result = compute_funnel_analysis(&self.funnel_id, &data_source, &steps);

        let mut output = ReportFormatter::format_funnel(&result, &format)?;
        if self.recommendations {
            let recommendations = derive_recommendations(&result);
            output.push('\n');
            output.push_str(&ReportFormatter::format_recommendations(
                &recommendations,
                &format,
            )?);
        }
        emit(&output, &self.output, "Funnel analysis")
    }
}

/// Show optimisation recommendations for the funnel
#[derive(Args)]
pub struct RecommendationsCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Derive recommendations locally from the funnel instead of asking the backend
    #[arg(long)]
    pub local: bool,

    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl RecommendationsCommand {
    pub async fn run(&self) -> AppResult<()> {
        let format = parse_format(&self.format)?;
        let (config, client) = self.api.connect()?;
        let funnel_id = &config.api.funnel_id;

        let recommendations = if self.local {
            derive_recommendations(&client.fetch_funnel(funnel_id).await?)
        } else {
            client.fetch_recommendations(funnel_id).await?
        };

        let output = ReportFormatter::format_recommendations(&recommendations, &format)?;
        emit(&output, &self.output, "Recommendations")
    }
}
