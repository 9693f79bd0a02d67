//! Funnel and recommendation report formatters

use super::utils::{bar, csv_to_string, export_json, format_number, format_percentage};
use super::{unsupported, OutputFormat};
use crate::analysis::funnel_metrics::{classify_drop_off, summarize_funnel, FunnelSummary};
use crate::analysis::recommendations::by_priority;
use crate::errors::AppResult;
use crate::export::write_funnel_csv;
use crate::types::{FunnelAnalysisResult, RecommendationsResponse};

const BAR_WIDTH: usize = 20;

/// Format a funnel analysis
///
/// The console view shows the headline figures followed by one row per
/// step, with the risk column taken from `classify_drop_off`.
pub fn format_funnel(result: &FunnelAnalysisResult, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => Ok(console_funnel(result)),
        OutputFormat::Json => export_json(result),
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_funnel_csv(result, &mut buffer)?;
            csv_to_string(buffer)
        }
    }
}

pub(crate) fn console_funnel(result: &FunnelAnalysisResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("=== FUNNEL ANALYSIS: {} ===\n\n", result.funnel_id));

    if result.is_empty() {
        output.push_str("No funnel steps reported.\n");
        return output;
    }

    output.push_str(&console_summary_lines(&summarize_funnel(result)));
    output.push('\n');

    output.push_str(&format!(
        "{:<28} | {:>10} | {:>10} | {:>9} | {:<9} | {}\n",
        "Step", "Users", "Conversion", "Drop-off", "Risk", "Conversion"
    ));
    output.push_str(&format!("{}\n", "-".repeat(100)));

    for step in result.steps() {
        output.push_str(&format!(
            "{:<28} | {:>10} | {:>10} | {:>9} | {:<9} | {}\n",
            step.step,
            format_number(step.count),
            format_percentage(step.conversion_rate),
            format_percentage(step.drop_off_rate),
            classify_drop_off(step.drop_off_rate),
            bar(step.conversion_rate, BAR_WIDTH),
        ));
    }

    output
}

fn console_summary_lines(summary: &FunnelSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Data source:       {}\n", summary.data_source));
    output.push_str(&format!(
        "Total users:       {}\n",
        format_number(summary.total_users)
    ));
    output.push_str(&format!(
        "Final conversion:  {}\n",
        format_percentage(summary.final_conversion_rate)
    ));
    output.push_str(&format!(
        "Average drop-off:  {}\n",
        format_percentage(summary.average_drop_off)
    ));
    if let Some(step) = &summary.biggest_drop_off_step {
        output.push_str(&format!(
            "Biggest drop-off:  {} ({})\n",
            step,
            format_percentage(summary.biggest_drop_off_rate)
        ));
    }
    output.push_str(&format!("Funnel health:     {}\n", summary.health));
    if !summary.high_risk_steps.is_empty() {
        output.push_str(&format!(
            "High-risk steps:   {}\n",
            summary.high_risk_steps.join(", ")
        ));
    }
    output
}

pub fn format_funnel_summary(summary: &FunnelSummary, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!("=== FUNNEL SUMMARY: {} ===\n\n", summary.funnel_id);
            output.push_str(&format!("Steps:             {}\n", summary.step_count));
            output.push_str(&console_summary_lines(summary));
            Ok(output)
        }
        OutputFormat::Json => export_json(summary),
        OutputFormat::Csv => Err(unsupported(format, "funnel summaries")),
    }
}

/// Format recommendations, most urgent first
pub fn format_recommendations(
    response: &RecommendationsResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => Ok(console_recommendations(response)),
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "recommendations")),
    }
}

pub(crate) fn console_recommendations(response: &RecommendationsResponse) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "=== RECOMMENDATIONS: {} ({} total, health: {}) ===\n\n",
        response.funnel_id,
        response.recommendations.len(),
        response.funnel_health
    ));

    if response.recommendations.is_empty() {
        output.push_str("No recommendations, the funnel is within expected ranges.\n");
        return output;
    }

    for rec in by_priority(response) {
        output.push_str(&format!("[{}] {}\n", rec.priority, rec.step));
        output.push_str(&format!("  Issue:    {}\n", rec.issue));
        output.push_str(&format!("  Action:   {}\n", rec.recommendation));
        output.push_str(&format!("  Impact:   {}\n\n", rec.expected_impact));
    }

    output
}
