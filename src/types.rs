//! Onboarding Funnel Watcher - Type System
//!
//! - `funnel`: Funnel analysis results and raw step counts
//! - `insights`: AI insight items and the agent envelopes that carry them
//! - `recommendations`: Rule-based recommendations and funnel health
//! - `analytics`: Segments, cohorts, session replays, comprehensive reports
//! - `status`: Health check, agent status and PostHog event listings
//!
//! Every backend type is consumed permissively: fields are `#[serde(default)]`
//! so a missing collection deserialises as empty rather than failing the fetch.

pub mod analytics;
pub mod funnel;
pub mod insights;
pub mod recommendations;
pub mod status;

pub use analytics::{
    CohortData, CohortsResponse, ComprehensiveReport, ComprehensiveReportResponse,
    PredictiveInsightsResponse, ReportSummary, SegmentsResponse, SessionReplay,
    SessionReplaysResponse, UserSegment,
};
pub use funnel::{FunnelAnalysisResult, RawStep, StepResult};
pub use insights::{
    AgentPerformance, AnalysisTriggerResponse, AnomaliesResponse, CollaborationMetrics,
    CollaborationReport, CollaborationSystemHealth, ImpactLevel, InsightCollection, InsightItem,
    InsightType, InsightsResponse, OptimizationsResponse, PatternsResponse, PredictionsResponse,
};
pub use recommendations::{FunnelHealth, Priority, Recommendation, RecommendationsResponse};
pub use status::{AgentState, AgentStatusResponse, HealthStatus, PostHogEventsResponse};
