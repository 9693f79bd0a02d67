//! AI insight items and the envelopes the agent endpoints wrap them in

use crate::utils::time::deserialize_lenient_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of finding an agent produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Insight,
    Prediction,
    Anomaly,
    Optimization,
    Pattern,
    Recommendation,
    MetaAnalysis,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightType::Insight => "insight",
            InsightType::Prediction => "prediction",
            InsightType::Anomaly => "anomaly",
            InsightType::Optimization => "optimization",
            InsightType::Pattern => "pattern",
            InsightType::Recommendation => "recommendation",
            InsightType::MetaAnalysis => "meta_analysis",
            InsightType::Unknown => "unknown",
        };
        f.pad(label)
    }
}

impl FromStr for InsightType {
    type Err = String;

    /// Accepts the wire names; `unknown` is not a valid filter
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "insight" => Ok(InsightType::Insight),
            "prediction" => Ok(InsightType::Prediction),
            "anomaly" => Ok(InsightType::Anomaly),
            "optimization" => Ok(InsightType::Optimization),
            "pattern" => Ok(InsightType::Pattern),
            "recommendation" => Ok(InsightType::Recommendation),
            "meta_analysis" => Ok(InsightType::MetaAnalysis),
            other => Err(format!("unknown insight type '{}'", other)),
        }
    }
}

/// Severity an agent attached to an insight
///
/// Ordered by [`rank`](Self::rank): `Critical` sorts highest, `Unknown` below `Low`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ImpactLevel {
    /// Severity rank, 0 for `Unknown`
    pub fn rank(self) -> u8 {
        match self {
            ImpactLevel::Unknown => 0,
            ImpactLevel::Low => 1,
            ImpactLevel::Medium => 2,
            ImpactLevel::High => 3,
            ImpactLevel::Critical => 4,
        }
    }

    pub const ALL: [ImpactLevel; 5] = [
        ImpactLevel::Critical,
        ImpactLevel::High,
        ImpactLevel::Medium,
        ImpactLevel::Low,
        ImpactLevel::Unknown,
    ];
}

impl Ord for ImpactLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for ImpactLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImpactLevel::Unknown => "unknown",
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        };
        f.pad(label)
    }
}

/// Single agent finding
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightItem {
    pub insight_type: InsightType,
    pub impact_level: ImpactLevel,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub description: String,
    pub suggested_actions: Vec<String>,
    pub data_points: serde_json::Map<String, serde_json::Value>,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response envelopes that carry a list of [`InsightItem`]s
pub trait InsightCollection {
    fn items(&self) -> &[InsightItem];

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl InsightCollection for Vec<InsightItem> {
    fn items(&self) -> &[InsightItem] {
        self
    }
}

/// `GET /ai/insights/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsResponse {
    pub funnel_id: String,
    pub total_insights: usize,
    pub insights: Vec<InsightItem>,
    pub insight_types_available: Vec<InsightType>,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
    pub system_confidence: f64,
}

/// `GET /ai/predictions/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionsResponse {
    pub funnel_id: String,
    pub predictions: Vec<InsightItem>,
    pub predictor_confidence: f64,
    pub prediction_accuracy: f64,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// `GET /ai/anomalies/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomaliesResponse {
    pub funnel_id: String,
    pub anomalies: Vec<InsightItem>,
    pub anomaly_count: usize,
    pub detector_status: String,
    pub detector_trained: bool,
    pub baseline_established: bool,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// `GET /ai/optimizations/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationsResponse {
    pub funnel_id: String,
    pub optimizations: Vec<InsightItem>,
    pub optimization_count: usize,
    pub optimizer_confidence: f64,
    pub decisions_made: u64,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// `GET /ai/patterns/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsResponse {
    pub funnel_id: String,
    pub patterns: Vec<InsightItem>,
    pub pattern_count: usize,
    pub trend_history_size: usize,
    pub analyzer_confidence: f64,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborationMetrics {
    pub collaboration_score: f64,
    pub consensus_level: f64,
    pub system_confidence: f64,
    pub total_insights_generated: usize,
    pub agent_participation: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPerformance {
    pub confidence_level: f64,
    pub decisions_made: u64,
    pub status: String,
    pub insights_contributed: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborationSystemHealth {
    pub all_agents_active: bool,
    pub average_agent_confidence: f64,
    pub total_decisions_made: u64,
}

/// `GET /ai/collaboration-report/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborationReport {
    pub funnel_id: String,
    pub collaboration_metrics: CollaborationMetrics,
    pub agent_performance: BTreeMap<String, AgentPerformance>,
    pub top_insights: Vec<InsightItem>,
    pub system_health: CollaborationSystemHealth,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// `POST /ai/analyze/{funnel_id}`
///
/// The orchestrator output is passed through untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisTriggerResponse {
    pub funnel_id: String,
    pub ai_analysis: serde_json::Value,
    #[serde(deserialize_with = "deserialize_lenient_timestamp")]
    pub analysis_timestamp: Option<DateTime<Utc>>,
    pub data_source: String,
}

macro_rules! impl_insight_collection {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl InsightCollection for $ty {
                fn items(&self) -> &[InsightItem] {
                    &self.$field
                }
            }
        )*
    };
}

impl_insight_collection! {
    InsightsResponse => insights,
    PredictionsResponse => predictions,
    AnomaliesResponse => anomalies,
    OptimizationsResponse => optimizations,
    PatternsResponse => patterns,
    CollaborationReport => top_insights,
}
