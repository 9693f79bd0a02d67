use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Onboarding funnel analytics client
#[derive(Parser)]
#[command(name = "funnel-watch")]
#[command(about = "Poll, inspect and export onboarding funnel analytics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check analytics backend connectivity
    Health(commands::health::HealthCommand),
    /// Fetch and display the funnel analysis
    Funnel(commands::funnel::FunnelCommand),
    /// Poll the funnel on a schedule and print every update
    Watch(commands::watch::WatchCommand),
    /// Export the funnel (and optionally insights) to CSV
    Export(commands::funnel::ExportCommand),
    /// Compute a funnel analysis offline from step counts
    Compute(commands::funnel::ComputeCommand),
    /// Show optimisation recommendations
    Recommendations(commands::funnel::RecommendationsCommand),
    /// AI agent insights, predictions and analysis runs
    Insights(commands::insights::InsightsCommand),
    /// Segments, cohorts and session replays
    Analytics(commands::analytics::AnalyticsCommand),
}

pub async fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "warn" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Health(command) => command.run().await,
        Commands::Funnel(command) => command.run().await,
        Commands::Watch(command) => command.run().await,
        Commands::Export(command) => command.run().await,
        Commands::Compute(command) => command.run(),
        Commands::Recommendations(command) => command.run().await,
        Commands::Insights(command) => command.run().await,
        Commands::Analytics(command) => command.run().await,
    }
}
