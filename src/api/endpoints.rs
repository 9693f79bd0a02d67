use reqwest::Method;
use std::fmt;

/// Backend endpoints consumed by the dashboard
///
/// Variants carrying a `String` take the funnel id as their final path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    Health,
    Funnel(String),
    Recommendations(String),
    PostHogEvents,
    AgentStatus,
    /// Triggers a full multi-agent analysis (POST, empty body)
    Analyze(String),
    Insights(String),
    Predictions(String),
    Anomalies(String),
    Optimizations(String),
    Patterns(String),
    CollaborationReport(String),
    Segments(String),
    Cohorts(String),
    SessionReplays(String),
    PredictiveInsights(String),
    ComprehensiveReport(String),
}

impl Endpoint {
    /// Unencoded path segments, in order
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Root => vec![],
            Endpoint::Health => vec!["health"],
            Endpoint::Funnel(id) => vec!["funnel", id.as_str()],
            Endpoint::Recommendations(id) => vec!["recommendations", id.as_str()],
            Endpoint::PostHogEvents => vec!["posthog", "events"],
            Endpoint::AgentStatus => vec!["ai", "agents", "status"],
            Endpoint::Analyze(id) => vec!["ai", "analyze", id.as_str()],
            Endpoint::Insights(id) => vec!["ai", "insights", id.as_str()],
            Endpoint::Predictions(id) => vec!["ai", "predictions", id.as_str()],
            Endpoint::Anomalies(id) => vec!["ai", "anomalies", id.as_str()],
            Endpoint::Optimizations(id) => vec!["ai", "optimizations", id.as_str()],
            Endpoint::Patterns(id) => vec!["ai", "patterns", id.as_str()],
            Endpoint::CollaborationReport(id) => vec!["ai", "collaboration-report", id.as_str()],
            Endpoint::Segments(id) => vec!["analytics", "segments", id.as_str()],
            Endpoint::Cohorts(id) => vec!["analytics", "cohorts", id.as_str()],
            Endpoint::SessionReplays(id) => vec!["analytics", "session-replays", id.as_str()],
            Endpoint::PredictiveInsights(id) => vec!["analytics", "predictive-insights", id.as_str()],
            Endpoint::ComprehensiveReport(id) => vec!["analytics", "comprehensive-report", id.as_str()],
        }
    }

    /// Path as written in logs and error messages, e.g. `/funnel/onboarding`
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Analyze(_) => Method::POST,
            _ => Method::GET,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
