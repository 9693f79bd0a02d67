//! Connection, backend health and agent status formatters

use super::funnel::{console_funnel, console_recommendations};
use super::insights::console_items;
use super::utils::{export_json, format_confidence, format_number};
use super::{unsupported, OutputFormat};
use crate::analysis::insight_summary::rank_insights;
use crate::errors::AppResult;
use crate::poller::{ConnectionStatus, DashboardState};
use crate::types::{AgentStatusResponse, HealthStatus, PostHogEventsResponse};
use crate::utils::time::{format_age, format_timestamp};
use chrono::{DateTime, Utc};

/// Insights shown under the funnel in the live view
const DASHBOARD_INSIGHTS: usize = 5;

/// One status line: indicator, freshness and the last error if any
pub fn status_line(state: &DashboardState, now: DateTime<Utc>) -> String {
    let indicator = match state.connection {
        ConnectionStatus::Connecting => "[..] connecting",
        ConnectionStatus::Connected => "[ok] connected",
        ConnectionStatus::Error => "[!!] error",
    };

    let freshness = match &state.last_updated {
        Some(at) => format!("updated {}", format_age(at, &now)),
        None => "no data yet".to_string(),
    };

    let mut line = format!("{} | {}", indicator, freshness);
    if state.connection == ConnectionStatus::Error {
        if let Some(error) = &state.last_error {
            line.push_str(&format!(" | {}", error));
        }
        if state.is_stale() {
            line.push_str(" | showing last good data");
        }
    }
    line
}

/// Format the live dashboard: status line, then whatever data is on screen
pub fn format_dashboard_state(
    state: &DashboardState,
    now: DateTime<Utc>,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = status_line(state, now);
            output.push_str("\n\n");

            if let Some(data) = &state.data {
                output.push_str(&console_funnel(&data.funnel));
                if let Some(recommendations) = &data.recommendations {
                    output.push('\n');
                    output.push_str(&console_recommendations(recommendations));
                }
                if let Some(insights) = &data.insights {
                    let mut top = rank_insights(&insights.insights);
                    top.truncate(DASHBOARD_INSIGHTS);
                    output.push_str("\n=== TOP INSIGHTS ===\n\n");
                    output.push_str(&console_items(&top));
                }
            }

            output.push_str(&format!(
                "\nrequests: {} ok, {} failed, {} superseded\n",
                state.successes, state.failures, state.discarded
            ));
            Ok(output)
        }
        OutputFormat::Json => export_json(state),
        OutputFormat::Csv => Err(unsupported(format, "dashboard state")),
    }
}

pub fn format_health(health: &HealthStatus, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = String::from("=== BACKEND HEALTH ===\n\n");
            output.push_str(&format!(
                "Status:              {}{}\n",
                health.status,
                if health.is_ok() { "" } else { " (degraded)" }
            ));
            if !health.message.is_empty() {
                output.push_str(&format!("Message:             {}\n", health.message));
            }
            if !health.data_source.is_empty() {
                output.push_str(&format!("Data source:         {}\n", health.data_source));
            }
            output.push_str(&format!(
                "PostHog configured:  {}\n",
                yes_no(health.posthog_configured)
            ));
            output.push_str(&format!(
                "PostHog connection:  {}\n",
                yes_no(health.posthog_connection)
            ));
            Ok(output)
        }
        OutputFormat::Json => export_json(health),
        OutputFormat::Csv => Err(unsupported(format, "health checks")),
    }
}

pub fn format_agent_status(
    response: &AgentStatusResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = String::from("=== AI AGENTS ===\n\n");
            output.push_str(&format!(
                "Agents available:  {}\n",
                yes_no(response.agents_available)
            ));
            output.push_str(&format!("Total agents:      {}\n", response.total_agents));
            output.push_str(&format!("System health:     {}\n\n", response.system_health));

            if response.agent_states.is_empty() {
                return Ok(output);
            }

            output.push_str(&format!(
                "{:<24} | {:<10} | {:>10} | {:>9} | {:>8} | {}\n",
                "Agent", "Status", "Confidence", "Decisions", "Insights", "Last action"
            ));
            output.push_str(&format!("{}\n", "-".repeat(96)));
            for (key, agent) in &response.agent_states {
                let name = if agent.name.is_empty() { key } else { &agent.name };
                output.push_str(&format!(
                    "{:<24} | {:<10} | {:>10} | {:>9} | {:>8} | {}\n",
                    name,
                    agent.status,
                    format_confidence(agent.confidence_level),
                    format_number(agent.decisions_made),
                    agent.insights_generated,
                    agent
                        .last_action
                        .as_ref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                ));
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "agent status")),
    }
}

pub fn format_posthog_events(
    response: &PostHogEventsResponse,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Console => {
            let mut output = String::from("=== POSTHOG EVENTS ===\n\n");
            output.push_str(&format!(
                "Total events:        {}\n",
                format_number(response.total_events as u64)
            ));
            output.push_str(&format!(
                "Unique event types:  {}\n",
                response.unique_event_types
            ));
            for event_type in &response.event_types {
                output.push_str(&format!("  - {}\n", event_type));
            }
            Ok(output)
        }
        OutputFormat::Json => export_json(response),
        OutputFormat::Csv => Err(unsupported(format, "PostHog events")),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
