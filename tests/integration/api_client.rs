use crate::common::{
    client_for, client_for_url, funnel_payload, insights_payload, unreachable_client,
};
use funnel_watch::api::Endpoint;
use funnel_watch::errors::{ApiError, ApiErrorKind};
use funnel_watch::types::{FunnelAnalysisResult, FunnelHealth, ImpactLevel, InsightType};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_funnel_success() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funnel/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(funnel_payload("onboarding", 1000, 640)))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_funnel("onboarding").await?;

    assert_eq!(result.funnel_id, "onboarding");
    assert_eq!(result.total_users, 1000);
    assert_eq!(result.analysis.len(), 2);
    assert_eq!(result.analysis[1].step, "Email Verified");
    assert_eq!(result.analysis[1].count, 640);
    Ok(())
}

#[tokio::test]
async fn test_generic_fetch_once() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funnel/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(funnel_payload("checkout", 50, 10)))
        .mount(&server)
        .await;

    let result: FunnelAnalysisResult = client_for(&server)
        .fetch_once(&Endpoint::Funnel("checkout".to_string()))
        .await?;
    assert_eq!(result.final_conversion_rate, 20.0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funnel/onboarding"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Error processing funnel data: boom"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_funnel("onboarding").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.endpoint(), "/funnel/onboarding");
    assert!(err.to_string().contains("Error processing funnel data: boom"));
}

#[tokio::test]
async fn test_not_found_is_network_error() {
    let server = MockServer::start().await;

    let err = client_for(&server).fetch_funnel("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::Network { status: Some(404), .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funnel/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_funnel("onboarding").await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Parse);
}

#[tokio::test]
async fn test_wrong_shape_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/funnel/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"analysis": "not a list"})))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_funnel("onboarding").await.unwrap_err();
    assert_eq!(err.kind(), ApiErrorKind::Parse);
}

#[tokio::test]
async fn test_error_field_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ai/insights/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "AI agents not available",
            "insights": []
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_insights("onboarding", None, None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Application {
            endpoint: "/ai/insights/onboarding".to_string(),
            message: "AI agents not available".to_string(),
        }
    );
}

#[tokio::test]
async fn test_null_error_field_is_not_an_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let mut payload = funnel_payload("onboarding", 10, 5);
    payload["error"] = serde_json::Value::Null;
    Mock::given(method("GET"))
        .and(path("/funnel/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_funnel("onboarding").await?;
    assert_eq!(result.total_users, 10);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let err = unreachable_client().fetch_funnel("onboarding").await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_connection_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "Onboarding Funnel Analytics API",
            "data_source": "Mock Data"
        })))
        .mount(&server)
        .await;

    assert!(client_for(&server).test_connection().await);
    assert!(!unreachable_client().test_connection().await);
}

#[tokio::test]
async fn test_insights_query_parameters() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ai/insights/onboarding"))
        .and(query_param("insight_type", "anomaly"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(insights_payload("onboarding")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch_insights("onboarding", Some(InsightType::Anomaly), Some(5))
        .await?;

    assert_eq!(response.insights.len(), 2);
    assert_eq!(response.insights[0].impact_level, ImpactLevel::Critical);
    assert_eq!(response.insights[0].suggested_actions.len(), 2);
    assert!(response.insights[0].created_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_analytics_query_parameters() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/session-replays/onboarding"))
        .and(query_param("limit", "3"))
        .and(query_param("filter_dropped", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "funnel_id": "onboarding",
            "sessions": [{
                "session_id": "s-1",
                "user_id": "u-1",
                "timestamp": "2024-05-02T08:00:00",
                "duration": 312,
                "events": [{"event": "signup"}, {"event": "tutorial_start"}],
                "conversion_status": "dropped",
                "drop_off_point": "tutorial_start"
            }],
            "total_sessions": 1,
            "filter_dropped": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analytics/cohorts/onboarding"))
        .and(query_param("months_back", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "funnel_id": "onboarding",
            "cohorts": [],
            "total_cohorts": 0,
            "months_analyzed": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sessions = client
        .fetch_session_replays("onboarding", Some(3), Some(true))
        .await?;
    assert!(sessions.sessions[0].dropped_off());
    assert_eq!(sessions.sessions[0].events.len(), 2);

    let cohorts = client.fetch_cohorts("onboarding", Some(3)).await?;
    assert_eq!(cohorts.months_analyzed, 3);
    Ok(())
}

#[tokio::test]
async fn test_trigger_analysis_posts() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai/analyze/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "funnel_id": "onboarding",
            "ai_analysis": {"meta_insights": [], "agents_consulted": 4},
            "analysis_timestamp": "2024-05-01T10:00:00",
            "data_source": "Mock Data"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).trigger_analysis("onboarding").await?;
    assert_eq!(response.ai_analysis["agents_consulted"], 4);
    assert!(response.analysis_timestamp.is_some());
    Ok(())
}

#[tokio::test]
async fn test_recommendations_and_unknown_enums() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recommendations/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "funnel_id": "onboarding",
            "recommendations": [{"step": "Signup", "priority": "urgent", "issue": "x"}],
            "funnel_health": "excellent",
            "total_recommendations": 1
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).fetch_recommendations("onboarding").await?;
    assert_eq!(response.funnel_health, FunnelHealth::Unknown);
    assert_eq!(response.recommendations[0].recommendation, "");
    Ok(())
}

#[tokio::test]
async fn test_base_url_with_path_prefix() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/funnel/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(funnel_payload("onboarding", 10, 5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_url(&format!("{}/api/v1/", server.uri()));
    let result = client.fetch_funnel("onboarding").await?;
    assert_eq!(result.total_users, 10);
    Ok(())
}
