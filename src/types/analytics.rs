//! Advanced analytics payloads: behaviour segments, cohorts, session replays

use crate::utils::time::deserialize_lenient_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSegment {
    pub segment_id: String,
    pub name: String,
    pub description: String,
    pub user_count: u64,
    /// Fraction 0.0 - 1.0, unlike funnel step rates
    pub conversion_rate: f64,
    pub avg_time_to_convert: f64,
    pub characteristics: serde_json::Map<String, serde_json::Value>,
    pub drop_off_patterns: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortData {
    pub cohort_date: String,
    pub cohort_size: u64,
    /// Period label (e.g. `week_1`) to retention fraction
    pub retention_rates: BTreeMap<String, f64>,
    pub conversion_funnel: BTreeMap<String, f64>,
    pub revenue_per_user: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionReplay {
    pub session_id: String,
    pub user_id: String,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds
    pub duration: u64,
    pub events: Vec<serde_json::Value>,
    pub conversion_status: String,
    pub drop_off_point: Option<String>,
    pub user_agent: String,
    pub device_type: String,
}

/// `GET /analytics/segments/{id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentsResponse {
    pub funnel_id: String,
    pub segments: Vec<UserSegment>,
    pub total_segments: usize,
    pub lookback_days: u32,
}

/// `GET /analytics/cohorts/{id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortsResponse {
    pub funnel_id: String,
    pub cohorts: Vec<CohortData>,
    pub total_cohorts: usize,
    pub months_analyzed: u32,
}

/// `GET /analytics/session-replays/{id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionReplaysResponse {
    pub funnel_id: String,
    pub sessions: Vec<SessionReplay>,
    pub total_sessions: usize,
    pub filter_dropped: bool,
}

/// `GET /analytics/predictive-insights/{id}`
///
/// The insight document (churn prediction, forecasts, benchmarks) is model
/// output with no stable schema, so it is kept as raw JSON.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictiveInsightsResponse {
    pub funnel_id: String,
    pub predictive_insights: serde_json::Value,
    pub segments_analyzed: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    pub total_users_analyzed: u64,
    pub average_conversion_rate: f64,
    pub high_risk_segments: usize,
    pub optimization_opportunities: usize,
    pub churn_risk_score: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentSection {
    pub segments: Vec<UserSegment>,
    pub total_segments: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortSection {
    pub cohorts: Vec<CohortData>,
    pub total_cohorts: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub sessions: Vec<SessionReplay>,
    pub total_sessions: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveReport {
    pub user_segments: SegmentSection,
    pub cohort_analysis: CohortSection,
    pub session_replays: SessionSection,
    pub predictive_insights: serde_json::Value,
    pub summary: ReportSummary,
}

/// `GET /analytics/comprehensive-report/{id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveReportResponse {
    pub funnel_id: String,
    pub comprehensive_report: ComprehensiveReport,
}

impl CohortData {
    /// Retention for a period label, if the backend reported one
    pub fn retention(&self, period: &str) -> Option<f64> {
        self.retention_rates.get(period).copied()
    }
}

impl SessionReplay {
    pub fn dropped_off(&self) -> bool {
        self.drop_off_point.is_some()
    }
}
