//! Common Test Utilities
//!
//! Shared fixtures for unit and integration tests: backend payloads shaped
//! like the analytics service returns them, and helpers to point an
//! `ApiClient` at a `wiremock` server.

#![allow(dead_code)]

use funnel_watch::analysis::compute_funnel_analysis;
use funnel_watch::api::ApiClient;
use funnel_watch::config::ApiConfig;
use funnel_watch::poller::DashboardState;
use funnel_watch::types::{FunnelAnalysisResult, RawStep, StepResult};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::watch;
use wiremock::MockServer;

/// Step counts the backend serves when PostHog has no data
pub const MOCK_COUNTS: [(&str, u64); 5] = [
    ("signup", 1000),
    ("email_verification", 800),
    ("tutorial_start", 600),
    ("tutorial_complete", 400),
    ("first_action", 300),
];

pub fn mock_raw_steps() -> Vec<RawStep> {
    MOCK_COUNTS
        .iter()
        .map(|(name, count)| RawStep::new(*name, *count))
        .collect()
}

/// The backend's mock funnel, computed the same way the backend does
pub fn mock_funnel() -> FunnelAnalysisResult {
    compute_funnel_analysis("onboarding", "Mock Data", &mock_raw_steps())
}

/// `/funnel/{id}` payload for a two-step funnel with the given counts
pub fn funnel_payload(funnel_id: &str, first: u64, second: u64) -> Value {
    let conversion = second as f64 / first as f64 * 100.0;
    json!({
        "funnel_id": funnel_id,
        "analysis": [
            {"step": "Signup", "count": first, "conversion_rate": 100.0, "drop_off_rate": 0},
            {"step": "Email Verified", "count": second,
             "conversion_rate": conversion, "drop_off_rate": 100.0 - conversion}
        ],
        "raw_steps": [
            {"name": "signup", "count": first},
            {"name": "email_verified", "count": second}
        ],
        "data_source": "Mock Data",
        "total_steps": 2,
        "total_users": first,
        "final_conversion_rate": conversion,
        "posthog_configured": false
    })
}

pub fn recommendations_payload(funnel_id: &str) -> Value {
    json!({
        "funnel_id": funnel_id,
        "recommendations": [{
            "step": "Overall Funnel",
            "priority": "critical",
            "issue": "Low overall conversion rate of 18.5%",
            "recommendation": "Conduct comprehensive user research",
            "expected_impact": "25-50% improvement"
        }],
        "funnel_health": "critical",
        "total_recommendations": 1
    })
}

pub fn insights_payload(funnel_id: &str) -> Value {
    json!({
        "funnel_id": funnel_id,
        "total_insights": 2,
        "insights": [
            {
                "insight_type": "anomaly",
                "confidence": 0.91,
                "description": "Email verification completions dropped 40% since yesterday",
                "impact_level": "critical",
                "suggested_actions": ["Check email provider status", "Resend pending verifications"],
                "data_points": {"baseline": 0.8, "current": 0.48},
                "created_at": "2024-05-01T09:15:00.123456"
            },
            {
                "insight_type": "pattern",
                "confidence": 0.64,
                "description": "Mobile users abandon the tutorial twice as often",
                "impact_level": "medium",
                "suggested_actions": ["Shorten the mobile tutorial"],
                "data_points": {},
                "created_at": "2024-05-01T09:16:00"
            }
        ],
        "insight_types_available": ["anomaly", "pattern"],
        "generated_at": "2024-05-01T09:16:30",
        "system_confidence": 0.78
    })
}

/// Step result with only the fields metric tests look at
pub fn step(name: &str, drop_off_rate: f64) -> StepResult {
    StepResult {
        step: name.to_string(),
        drop_off_rate,
        ..StepResult::default()
    }
}

pub fn client_for_url(base_url: &str) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..ApiConfig::default()
    };
    ApiClient::new(&config).expect("valid test base URL")
}

pub fn client_for(server: &MockServer) -> ApiClient {
    client_for_url(&server.uri())
}

/// Client pointed at a port nothing listens on
pub fn unreachable_client() -> ApiClient {
    client_for_url("http://127.0.0.1:9")
}

/// Wait until a published snapshot satisfies `predicate`
pub async fn wait_for_state<F>(
    updates: &mut watch::Receiver<DashboardState>,
    predicate: F,
) -> DashboardState
where
    F: Fn(&DashboardState) -> bool,
{
    let wait = async {
        loop {
            {
                let state = updates.borrow_and_update();
                if predicate(&state) {
                    return state.clone();
                }
            }
            updates.changed().await.expect("state channel open");
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("state condition reached within 5s")
}

/// Number of requests the mock server has seen for `path`
pub async fn requests_to(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}
