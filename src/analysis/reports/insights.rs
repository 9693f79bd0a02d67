//! AI insight report formatters

use super::utils::{csv_to_string, export_json, format_confidence, truncate};
use super::{unsupported, OutputFormat};
use crate::analysis::insight_summary::{summarize_insights, InsightSummary};
use crate::errors::AppResult;
use crate::export::write_insights_csv;
use crate::types::{
    AnalysisTriggerResponse, CollaborationReport, ImpactLevel, InsightCollection, InsightItem,
};
use crate::utils::time::format_timestamp;
use serde::Serialize;

const DESCRIPTION_WIDTH: usize = 96;

/// Format any insight envelope (insights, predictions, anomalies, ...)
///
/// JSON output is the envelope as received; console and CSV output work on
/// its items only.
pub fn format_insights<C>(title: &str, collection: &C, format: &OutputFormat) -> AppResult<String>
where
    C: InsightCollection + Serialize,
{
    match format {
        OutputFormat::Console => {
            let summary = summarize_insights(collection);
            let mut output = format!("=== {} ===\n\n", title.to_uppercase());
            output.push_str(&console_summary(&summary));
            output.push('\n');
            output.push_str(&console_items(&summary.ranked));
            Ok(output)
        }
        OutputFormat::Json => export_json(collection),
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_insights_csv(collection.items(), &mut buffer)?;
            csv_to_string(buffer)
        }
    }
}

pub fn format_insight_summary(summary: &InsightSummary, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => Ok(console_summary(summary)),
        OutputFormat::Json => export_json(summary),
        OutputFormat::Csv => Err(unsupported(format, "insight summaries")),
    }
}

fn console_summary(summary: &InsightSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Total insights:      {}\n", summary.total));
    if summary.total == 0 {
        return output;
    }

    output.push_str(&format!(
        "Average confidence:  {}\n",
        format_confidence(summary.average_confidence)
    ));

    let impact: Vec<String> = ImpactLevel::ALL
        .iter()
        .filter(|level| summary.count(**level) > 0)
        .map(|level| format!("{} {}", summary.count(*level), level))
        .collect();
    output.push_str(&format!("By impact:           {}\n", impact.join(", ")));

    let types: Vec<String> = summary
        .by_type
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect();
    output.push_str(&format!("By type:             {}\n", types.join(", ")));
    output
}

pub(crate) fn console_items(items: &[InsightItem]) -> String {
    let mut output = String::new();
    for (i, item) in items.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}. [{}] {} ({} confidence)\n",
            i + 1,
            item.impact_level,
            item.insight_type,
            format_confidence(item.confidence)
        ));
        output.push_str(&format!(
            "     {}\n",
            truncate(&item.description, DESCRIPTION_WIDTH)
        ));
        for action in &item.suggested_actions {
            output.push_str(&format!("     - {}\n", action));
        }
        if let Some(created) = &item.created_at {
            output.push_str(&format!("     created {}\n", format_timestamp(created)));
        }
    }
    output
}

pub fn format_collaboration_report(
    report: &CollaborationReport,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let metrics = &report.collaboration_metrics;
            let mut output = format!("=== AGENT COLLABORATION: {} ===\n\n", report.funnel_id);
            output.push_str(&format!(
                "Collaboration score: {:.2}\n",
                metrics.collaboration_score
            ));
            output.push_str(&format!("Consensus level:     {:.2}\n", metrics.consensus_level));
            output.push_str(&format!(
                "System confidence:   {}\n",
                format_confidence(metrics.system_confidence)
            ));
            output.push_str(&format!(
                "Insights generated:  {}\n",
                metrics.total_insights_generated
            ));
            output.push_str(&format!(
                "All agents active:   {}\n\n",
                if report.system_health.all_agents_active { "yes" } else { "no" }
            ));

            output.push_str(&format!(
                "{:<24} | {:>10} | {:>10} | {:>8} | {}\n",
                "Agent", "Confidence", "Decisions", "Insights", "Status"
            ));
            output.push_str(&format!("{}\n", "-".repeat(72)));
            for (agent, perf) in &report.agent_performance {
                output.push_str(&format!(
                    "{:<24} | {:>10} | {:>10} | {:>8} | {}\n",
                    agent,
                    format_confidence(perf.confidence_level),
                    perf.decisions_made,
                    perf.insights_contributed,
                    perf.status
                ));
            }

            if !report.top_insights.is_empty() {
                output.push_str("\nTop insights:\n");
                output.push_str(&console_items(&report.top_insights));
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(report),
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_insights_csv(report.items(), &mut buffer)?;
            csv_to_string(buffer)
        }
    }
}

/// Orchestrator output is opaque, so the console view pretty-prints it
pub fn format_analysis_trigger(
    response: &AnalysisTriggerResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = format!("=== AI ANALYSIS: {} ===\n\n", response.funnel_id);
            if let Some(at) = &response.analysis_timestamp {
                output.push_str(&format!("Completed:    {}\n", format_timestamp(at)));
            }
            output.push_str(&format!("Data source:  {}\n\n", response.data_source));
            output.push_str(&export_json(&response.ai_analysis)?);
            output.push('\n');
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "analysis runs")),
    }
}
