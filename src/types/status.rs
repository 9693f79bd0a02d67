use crate::utils::time::deserialize_lenient_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /` and `GET /health`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub posthog_configured: bool,
    pub posthog_connection: bool,
    pub data_source: String,
    pub project_id: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentState {
    pub agent_id: String,
    pub name: String,
    pub status: String,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub last_action: Option<DateTime<Utc>>,
    pub confidence_level: f64,
    pub memory_size: u64,
    pub decisions_made: u64,
    pub insights_generated: usize,
}

/// `GET /ai/agents/status`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStatusResponse {
    pub agents_available: bool,
    pub total_agents: usize,
    pub agent_states: BTreeMap<String, AgentState>,
    pub system_health: String,
}

/// `GET /posthog/events`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostHogEventsResponse {
    pub total_events: usize,
    pub unique_event_types: usize,
    pub event_types: Vec<String>,
    pub sample_events: Vec<serde_json::Value>,
}
