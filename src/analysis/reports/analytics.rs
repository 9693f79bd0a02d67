//! Segment, cohort and session replay formatters

use super::utils::{export_json, format_number, format_percentage};
use super::{unsupported, OutputFormat};
use crate::errors::AppResult;
use crate::types::{
    CohortData, CohortsResponse, ComprehensiveReportResponse, PredictiveInsightsResponse,
    SegmentsResponse, SessionReplaysResponse, UserSegment,
};
use crate::utils::time::format_timestamp;
use std::collections::BTreeSet;

fn segment_rows(segments: &[UserSegment]) -> String {
    let mut output = format!(
        "{:<28} | {:>8} | {:>10} | {:>12}\n",
        "Segment", "Users", "Conversion", "Avg convert"
    );
    output.push_str(&format!("{}\n", "-".repeat(68)));
    for segment in segments {
        output.push_str(&format!(
            "{:<28} | {:>8} | {:>10} | {:>11.1}h\n",
            segment.name,
            format_number(segment.user_count),
            format_percentage(segment.conversion_rate * 100.0),
            segment.avg_time_to_convert
        ));
        if !segment.drop_off_patterns.is_empty() {
            output.push_str(&format!(
                "  drop-off patterns: {}\n",
                segment.drop_off_patterns.join(", ")
            ));
        }
    }
    output
}

/// Retention cell: `-` when the backend did not report that period
fn retention_cell(cohort: &CohortData, period: &str) -> String {
    cohort
        .retention(period)
        .map(|rate| format_percentage(rate * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

/// Columns are every retention period any cohort reports
fn cohort_rows(cohorts: &[CohortData]) -> String {
    let periods: BTreeSet<&str> = cohorts
        .iter()
        .flat_map(|c| c.retention_rates.keys().map(String::as_str))
        .collect();

    let mut output = format!("{:<12} | {:>8}", "Cohort", "Size");
    for period in &periods {
        output.push_str(&format!(" | {:>8}", period));
    }
    output.push('\n');
    output.push_str(&format!("{}\n", "-".repeat(23 + periods.len() * 11)));

    for cohort in cohorts {
        output.push_str(&format!(
            "{:<12} | {:>8}",
            cohort.cohort_date,
            format_number(cohort.cohort_size)
        ));
        for period in &periods {
            output.push_str(&format!(" | {:>8}", retention_cell(cohort, period)));
        }
        output.push('\n');
    }
    output
}

pub fn format_segments(response: &SegmentsResponse, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!(
                "=== USER SEGMENTS: {} (last {} days) ===\n\n",
                response.funnel_id, response.lookback_days
            );
            output.push_str(&segment_rows(&response.segments));
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "segments")),
    }
}

pub fn format_cohorts(response: &CohortsResponse, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!(
                "=== COHORT RETENTION: {} ({} months) ===\n\n",
                response.funnel_id, response.months_analyzed
            );
            output.push_str(&cohort_rows(&response.cohorts));
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "cohorts")),
    }
}

pub fn format_session_replays(
    response: &SessionReplaysResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!(
                "=== SESSION REPLAYS: {} ({} sessions{}) ===\n\n",
                response.funnel_id,
                response.sessions.len(),
                if response.filter_dropped { ", dropped only" } else { "" }
            );
            for session in &response.sessions {
                output.push_str(&format!(
                    "{} user={} {}s {} events [{}]",
                    session.session_id,
                    session.user_id,
                    session.duration,
                    session.events.len(),
                    session.conversion_status
                ));
                if let Some(point) = &session.drop_off_point {
                    output.push_str(&format!(" dropped at {}", point));
                }
                if let Some(at) = &session.timestamp {
                    output.push_str(&format!(" ({})", format_timestamp(at)));
                }
                output.push('\n');
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "session replays")),
    }
}

pub fn format_predictive_insights(
    response: &PredictiveInsightsResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!(
                "=== PREDICTIVE INSIGHTS: {} ({} segments analyzed) ===\n\n",
                response.funnel_id, response.segments_analyzed
            );
            output.push_str(&export_json(&response.predictive_insights)?);
            output.push('\n');
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "predictive insights")),
    }
}

pub fn format_comprehensive_report(
    response: &ComprehensiveReportResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let report = &response.comprehensive_report;
            let summary = &report.summary;
            let mut output = format!("=== COMPREHENSIVE REPORT: {} ===\n\n", response.funnel_id);
            output.push_str(&format!(
                "Users analyzed:             {}\n",
                format_number(summary.total_users_analyzed)
            ));
            output.push_str(&format!(
                "Average conversion:         {}\n",
                format_percentage(summary.average_conversion_rate * 100.0)
            ));
            output.push_str(&format!(
                "High-risk segments:         {}\n",
                summary.high_risk_segments
            ));
            output.push_str(&format!(
                "Optimization opportunities: {}\n",
                summary.optimization_opportunities
            ));
            output.push_str(&format!(
                "Churn risk score:           {:.2}\n",
                summary.churn_risk_score
            ));

            if !report.user_segments.segments.is_empty() {
                output.push_str("\n--- Segments ---\n");
                output.push_str(&segment_rows(&report.user_segments.segments));
            }
            if !report.cohort_analysis.cohorts.is_empty() {
                output.push_str("\n--- Cohorts ---\n");
                output.push_str(&cohort_rows(&report.cohort_analysis.cohorts));
            }
            if !report.session_replays.sessions.is_empty() {
                let dropped = report
                    .session_replays
                    .sessions
                    .iter()
                    .filter(|s| s.dropped_off())
                    .count();
                output.push_str(&format!(
                    "\n--- Sessions ---\n{} sampled, {} dropped off\n",
                    report.session_replays.sessions.len(),
                    dropped
                ));
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "comprehensive reports")),
    }
}
