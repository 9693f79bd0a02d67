//! Report formatting and output generation
//!
//! Provides formatting for dashboard data via the [`ReportFormatter`] facade.
//! Supports Console, JSON, and CSV output formats; CSV only where a tabular
//! export exists (funnel steps and insight collections).

pub mod analytics;
pub mod funnel;
pub mod insights;
pub mod status;
pub mod utils;

use crate::analysis::funnel_metrics::FunnelSummary;
use crate::analysis::insight_summary::InsightSummary;
use crate::errors::{AppError, AppResult};
use crate::poller::DashboardState;
use crate::types::{
    AgentStatusResponse, AnalysisTriggerResponse, CohortsResponse, CollaborationReport,
    ComprehensiveReportResponse, FunnelAnalysisResult, HealthStatus, InsightCollection,
    PostHogEventsResponse, PredictiveInsightsResponse, RecommendationsResponse, SegmentsResponse,
    SessionReplaysResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Output format options for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Console => "console",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.pad(label)
    }
}

/// Error for a format a report has no rendering for
pub(crate) fn unsupported(format: &OutputFormat, report: &str) -> AppError {
    AppError::InvalidData(format!(
        "{} output is not available for {}",
        format, report
    ))
}

/// Facade for all report formatting operations
pub struct ReportFormatter;

impl ReportFormatter {
    // Utilities
    pub fn format_number(n: u64) -> String {
        utils::format_number(n)
    }
    pub fn format_percentage(rate: f64) -> String {
        utils::format_percentage(rate)
    }

    // Funnel
    pub fn format_funnel(r: &FunnelAnalysisResult, f: &OutputFormat) -> AppResult<String> {
        funnel::format_funnel(r, f)
    }
    pub fn format_funnel_summary(s: &FunnelSummary, f: &OutputFormat) -> AppResult<String> {
        funnel::format_funnel_summary(s, f)
    }
    pub fn format_recommendations(
        r: &RecommendationsResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        funnel::format_recommendations(r, f)
    }

    // AI insights
    pub fn format_insights<C>(title: &str, c: &C, f: &OutputFormat) -> AppResult<String>
    where
        C: InsightCollection + Serialize,
    {
        insights::format_insights(title, c, f)
    }
    pub fn format_insight_summary(s: &InsightSummary, f: &OutputFormat) -> AppResult<String> {
        insights::format_insight_summary(s, f)
    }
    pub fn format_collaboration_report(
        r: &CollaborationReport,
        f: &OutputFormat,
    ) -> AppResult<String> {
        insights::format_collaboration_report(r, f)
    }
    pub fn format_analysis_trigger(
        r: &AnalysisTriggerResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        insights::format_analysis_trigger(r, f)
    }

    // Status
    pub fn format_dashboard_state(
        s: &DashboardState,
        now: DateTime<Utc>,
        f: &OutputFormat,
    ) -> AppResult<String> {
        status::format_dashboard_state(s, now, f)
    }
    pub fn format_health(h: &HealthStatus, f: &OutputFormat) -> AppResult<String> {
        status::format_health(h, f)
    }
    pub fn format_agent_status(r: &AgentStatusResponse, f: &OutputFormat) -> AppResult<String> {
        status::format_agent_status(r, f)
    }
    pub fn format_posthog_events(
        r: &PostHogEventsResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        status::format_posthog_events(r, f)
    }

    // Analytics
    pub fn format_segments(r: &SegmentsResponse, f: &OutputFormat) -> AppResult<String> {
        analytics::format_segments(r, f)
    }
    pub fn format_cohorts(r: &CohortsResponse, f: &OutputFormat) -> AppResult<String> {
        analytics::format_cohorts(r, f)
    }
    pub fn format_session_replays(
        r: &SessionReplaysResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        analytics::format_session_replays(r, f)
    }
    pub fn format_predictive_insights(
        r: &PredictiveInsightsResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        analytics::format_predictive_insights(r, f)
    }
    pub fn format_comprehensive_report(
        r: &ComprehensiveReportResponse,
        f: &OutputFormat,
    ) -> AppResult<String> {
        analytics::format_comprehensive_report(r, f)
    }
}
