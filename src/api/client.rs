use crate::api::Endpoint;
use crate::config::ApiConfig;
use crate::errors::{ApiError, ApiResult, AppError, AppResult};
use crate::types::{
    AgentStatusResponse, AnalysisTriggerResponse, AnomaliesResponse, CohortsResponse,
    CollaborationReport, ComprehensiveReportResponse, FunnelAnalysisResult, HealthStatus,
    InsightType, InsightsResponse, OptimizationsResponse, PatternsResponse, PostHogEventsResponse,
    PredictionsResponse, PredictiveInsightsResponse, RecommendationsResponse, SegmentsResponse,
    SessionReplaysResponse,
};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest slice of an error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Async client for the onboarding analytics backend
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the configured base URL
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!("API client targeting {}", base_url);

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint, with path segments percent-encoded
    pub fn url_for(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.segments());
        }
        url
    }

    /// Issue a single request and decode the JSON body
    ///
    /// No retry: a failure is reported once and the caller decides whether to
    /// try again.
    pub async fn fetch_once<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> ApiResult<T> {
        self.fetch_with_query(endpoint, &[]).await
    }

    /// [`fetch_once`](Self::fetch_once) with query parameters
    pub async fn fetch_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let label = endpoint.path();
        let url = self.url_for(endpoint);

        debug!("API request: {}", endpoint);

        let request = match endpoint.method() {
            Method::POST => self.http.post(url),
            _ => self.http.get(url),
        };

        let response = request
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                endpoint: label.clone(),
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned {}", endpoint, status);
            return Err(ApiError::Network {
                endpoint: label,
                status: Some(status.as_u16()),
                message: describe_error_body(status.as_u16(), &body),
            });
        }

        let body = response.text().await.map_err(|e| ApiError::Network {
            endpoint: label.clone(),
            status: Some(status.as_u16()),
            message: format!("Failed to read response: {}", e),
        })?;

        decode_body(&label, &body)
    }

    /// Check that the backend answers its root health check
    pub async fn test_connection(&self) -> bool {
        match self.fetch_root().await {
            Ok(health) => {
                info!(
                    "Analytics backend reachable at {} (data source: {})",
                    self.base_url, health.data_source
                );
                true
            }
            Err(e) => {
                warn!("Analytics backend connection test failed: {}", e);
                false
            }
        }
    }

    // ===== Core =====

    pub async fn fetch_root(&self) -> ApiResult<HealthStatus> {
        self.fetch_once(&Endpoint::Root).await
    }

    pub async fn fetch_health(&self) -> ApiResult<HealthStatus> {
        self.fetch_once(&Endpoint::Health).await
    }

    pub async fn fetch_funnel(&self, funnel_id: &str) -> ApiResult<FunnelAnalysisResult> {
        self.fetch_once(&Endpoint::Funnel(funnel_id.to_string())).await
    }

    pub async fn fetch_recommendations(
        &self,
        funnel_id: &str,
    ) -> ApiResult<RecommendationsResponse> {
        self.fetch_once(&Endpoint::Recommendations(funnel_id.to_string())).await
    }

    pub async fn fetch_posthog_events(&self) -> ApiResult<PostHogEventsResponse> {
        self.fetch_once(&Endpoint::PostHogEvents).await
    }

    // ===== AI agents =====

    pub async fn fetch_agent_status(&self) -> ApiResult<AgentStatusResponse> {
        self.fetch_once(&Endpoint::AgentStatus).await
    }

    pub async fn trigger_analysis(&self, funnel_id: &str) -> ApiResult<AnalysisTriggerResponse> {
        info!("Triggering AI analysis for funnel {}", funnel_id);
        self.fetch_once(&Endpoint::Analyze(funnel_id.to_string())).await
    }

    pub async fn fetch_insights(
        &self,
        funnel_id: &str,
        insight_type: Option<InsightType>,
        limit: Option<usize>,
    ) -> ApiResult<InsightsResponse> {
        let mut query = Vec::new();
        if let Some(kind) = insight_type {
            query.push(("insight_type", kind.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.fetch_with_query(&Endpoint::Insights(funnel_id.to_string()), &query).await
    }

    pub async fn fetch_predictions(&self, funnel_id: &str) -> ApiResult<PredictionsResponse> {
        self.fetch_once(&Endpoint::Predictions(funnel_id.to_string())).await
    }

    pub async fn fetch_anomalies(&self, funnel_id: &str) -> ApiResult<AnomaliesResponse> {
        self.fetch_once(&Endpoint::Anomalies(funnel_id.to_string())).await
    }

    pub async fn fetch_optimizations(&self, funnel_id: &str) -> ApiResult<OptimizationsResponse> {
        self.fetch_once(&Endpoint::Optimizations(funnel_id.to_string())).await
    }

    pub async fn fetch_patterns(&self, funnel_id: &str) -> ApiResult<PatternsResponse> {
        self.fetch_once(&Endpoint::Patterns(funnel_id.to_string())).await
    }

    pub async fn fetch_collaboration_report(
        &self,
        funnel_id: &str,
    ) -> ApiResult<CollaborationReport> {
        self.fetch_once(&Endpoint::CollaborationReport(funnel_id.to_string())).await
    }

    // ===== Advanced analytics =====

    pub async fn fetch_segments(
        &self,
        funnel_id: &str,
        lookback_days: Option<u32>,
    ) -> ApiResult<SegmentsResponse> {
        let query: Vec<_> = lookback_days
            .map(|days| ("lookback_days", days.to_string()))
            .into_iter()
            .collect();
        self.fetch_with_query(&Endpoint::Segments(funnel_id.to_string()), &query).await
    }

    pub async fn fetch_cohorts(
        &self,
        funnel_id: &str,
        months_back: Option<u32>,
    ) -> ApiResult<CohortsResponse> {
        let query: Vec<_> = months_back
            .map(|months| ("months_back", months.to_string()))
            .into_iter()
            .collect();
        self.fetch_with_query(&Endpoint::Cohorts(funnel_id.to_string()), &query).await
    }

    pub async fn fetch_session_replays(
        &self,
        funnel_id: &str,
        limit: Option<usize>,
        filter_dropped: Option<bool>,
    ) -> ApiResult<SessionReplaysResponse> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(filter_dropped) = filter_dropped {
            query.push(("filter_dropped", filter_dropped.to_string()));
        }
        self.fetch_with_query(&Endpoint::SessionReplays(funnel_id.to_string()), &query).await
    }

    pub async fn fetch_predictive_insights(
        &self,
        funnel_id: &str,
    ) -> ApiResult<PredictiveInsightsResponse> {
        self.fetch_once(&Endpoint::PredictiveInsights(funnel_id.to_string())).await
    }

    pub async fn fetch_comprehensive_report(
        &self,
        funnel_id: &str,
    ) -> ApiResult<ComprehensiveReportResponse> {
        self.fetch_once(&Endpoint::ComprehensiveReport(funnel_id.to_string())).await
    }
}

/// Decode a successful response body
///
/// Invalid JSON is a parse error. A top-level `error` field is an application
/// error even though the HTTP status was 2xx. Anything else is deserialised
/// permissively into `T`.
pub fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> ApiResult<T> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ApiError::Parse {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    if let Some(message) = application_error(&value) {
        return Err(ApiError::Application {
            endpoint: endpoint.to_string(),
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Parse {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

fn application_error(value: &serde_json::Value) -> Option<String> {
    match value.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Best human-readable message for a non-2xx body (FastAPI puts it in `detail`)
fn describe_error_body(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail") {
            return match detail {
                serde_json::Value::String(s) => format!("HTTP {}: {}", status, s),
                other => format!("HTTP {}: {}", status, other),
            };
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        let snippet: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("HTTP {}: {}", status, snippet)
    }
}
