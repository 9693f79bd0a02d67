use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Priority of a recommendation
///
/// Ordered by [`rank`](Self::rank), with `Unknown` below `Low`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Unknown => 0,
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Unknown => "unknown",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        };
        f.pad(label)
    }
}

/// Overall verdict on a funnel's final conversion rate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelHealth {
    Good,
    NeedsImprovement,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for FunnelHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FunnelHealth::Good => "good",
            FunnelHealth::NeedsImprovement => "needs_improvement",
            FunnelHealth::Critical => "critical",
            FunnelHealth::Unknown => "unknown",
        };
        f.pad(label)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub step: String,
    pub priority: Priority,
    pub issue: String,
    pub recommendation: String,
    pub expected_impact: String,
}

/// `GET /recommendations/{funnel_id}`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationsResponse {
    pub funnel_id: String,
    pub recommendations: Vec<Recommendation>,
    pub funnel_health: FunnelHealth,
    pub total_recommendations: usize,
}
