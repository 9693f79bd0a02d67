use crate::common::{
    client_for, funnel_payload, insights_payload, recommendations_payload, requests_to,
    unreachable_client, wait_for_state,
};
use funnel_watch::config::SequencePolicy;
use funnel_watch::errors::ApiErrorKind;
use funnel_watch::poller::{ApplyOutcome, ConnectionStatus, FunnelPoller, PollScope};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FUNNEL_PATH: &str = "/funnel/onboarding";

fn poller_for(server: &MockServer, scope: PollScope, policy: SequencePolicy) -> FunnelPoller {
    FunnelPoller::new(client_for(server), "onboarding", scope, policy)
}

async fn mount_funnel(server: &MockServer, total_users: u64) {
    Mock::given(method("GET"))
        .and(path(FUNNEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(funnel_payload("onboarding", total_users, 100)),
        )
        .mount(server)
        .await;
}

/// Mounts a one-shot funnel response that arrives after `delay`
async fn mount_funnel_once(server: &MockServer, total_users: u64, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(FUNNEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(funnel_payload("onboarding", total_users, 100))
                .set_delay(delay),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn shown_total_users(poller: &FunnelPoller) -> Option<u64> {
    poller.snapshot().data.map(|d| d.funnel.total_users)
}

#[tokio::test]
async fn test_initial_state_is_connecting() {
    let server = MockServer::start().await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);

    let state = poller.snapshot();
    assert_eq!(state.connection, ConnectionStatus::Connecting);
    assert!(!state.has_data());
    assert_eq!(state.latest_issued, 0);
}

#[tokio::test]
async fn test_refresh_success_connects() {
    let server = MockServer::start().await;
    mount_funnel(&server, 1000).await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);

    assert_eq!(poller.refresh().await, ApplyOutcome::Applied);

    let state = poller.snapshot();
    assert_eq!(state.connection, ConnectionStatus::Connected);
    assert_eq!(shown_total_users(&poller), Some(1000));
    assert!(state.last_updated.is_some());
    assert!(state.last_error.is_none());
    assert_eq!(state.successes, 1);
    assert_eq!(state.last_applied, 1);
}

#[tokio::test]
async fn test_first_failure_leaves_no_data() {
    let poller = FunnelPoller::new(
        unreachable_client(),
        "onboarding",
        PollScope::FunnelOnly,
        SequencePolicy::LatestIssued,
    );

    assert_eq!(poller.refresh().await, ApplyOutcome::Applied);

    let state = poller.snapshot();
    assert_eq!(state.connection, ConnectionStatus::Error);
    assert_eq!(state.last_error_kind, Some(ApiErrorKind::Network));
    assert!(state.data.is_none());
    assert!(!state.is_stale());
}

#[tokio::test]
async fn test_failure_after_success_keeps_data() {
    let server = MockServer::start().await;
    mount_funnel_once(&server, 1000, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path(FUNNEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "down"})))
        .mount(&server)
        .await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);

    poller.refresh().await;
    let before = poller.snapshot();
    poller.refresh().await;
    let after = poller.snapshot();

    assert_eq!(after.connection, ConnectionStatus::Error);
    assert_eq!(after.last_error_kind, Some(ApiErrorKind::Network));
    assert!(after.last_error.as_deref().is_some_and(|e| e.contains("down")));
    assert!(after.is_stale());
    assert_eq!(after.data, before.data);
    assert_eq!(after.last_updated, before.last_updated);
    assert_eq!((after.successes, after.failures), (1, 1));
}

#[tokio::test]
async fn test_recovery_clears_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FUNNEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_funnel(&server, 42).await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);

    poller.refresh().await;
    assert_eq!(poller.snapshot().last_error_kind, Some(ApiErrorKind::Parse));

    poller.refresh().await;
    let state = poller.snapshot();
    assert_eq!(state.connection, ConnectionStatus::Connected);
    assert!(state.last_error.is_none());
    assert_eq!(shown_total_users(&poller), Some(42));
}

#[tokio::test]
async fn test_late_response_is_discarded() {
    for policy in [SequencePolicy::LatestIssued, SequencePolicy::Monotonic] {
        let server = MockServer::start().await;
        mount_funnel_once(&server, 111, Duration::from_millis(300)).await;
        mount_funnel(&server, 222).await;
        let poller = poller_for(&server, PollScope::FunnelOnly, policy);

        let (older, newer) = tokio::join!(poller.refresh(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            poller.refresh().await
        });

        assert_eq!(older, ApplyOutcome::Superseded, "{:?}", policy);
        assert_eq!(newer, ApplyOutcome::Applied, "{:?}", policy);
        let state = poller.snapshot();
        assert_eq!(shown_total_users(&poller), Some(222));
        assert_eq!(state.discarded, 1);
        assert_eq!(state.last_applied, 2);
    }
}

#[tokio::test]
async fn test_policies_differ_on_early_older_response() {
    // Request 1 completes while request 2 is still in flight
    let mut shown = Vec::new();
    for policy in [SequencePolicy::LatestIssued, SequencePolicy::Monotonic] {
        let server = MockServer::start().await;
        mount_funnel_once(&server, 111, Duration::from_millis(150)).await;
        mount_funnel_once(&server, 222, Duration::from_millis(400)).await;
        let poller = poller_for(&server, PollScope::FunnelOnly, policy);
        let mut updates = poller.subscribe();

        let (older, _) = tokio::join!(poller.refresh(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            poller.refresh().await
        });
        shown.push((policy, older));

        let state = wait_for_state(&mut updates, |s| s.last_applied == 2).await;
        assert_eq!(state.data.map(|d| d.funnel.total_users), Some(222));
    }

    assert_eq!(
        shown,
        vec![
            (SequencePolicy::LatestIssued, ApplyOutcome::Superseded),
            (SequencePolicy::Monotonic, ApplyOutcome::Applied),
        ]
    );
}

#[tokio::test]
async fn test_polling_publishes_updates_until_stopped() {
    let server = MockServer::start().await;
    mount_funnel(&server, 1000).await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);
    let mut updates = poller.subscribe();

    poller.start_polling(Duration::from_millis(50)).unwrap();
    assert!(poller.is_polling());

    let state = wait_for_state(&mut updates, |s| s.successes >= 2).await;
    assert_eq!(state.connection, ConnectionStatus::Connected);

    assert!(poller.stop_polling());
    assert!(!poller.is_polling());

    // Let requests already in flight settle
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_stop = requests_to(&server, FUNNEL_PATH).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(requests_to(&server, FUNNEL_PATH).await, after_stop);
}

#[tokio::test]
async fn test_default_policy_shows_data_when_backend_is_slower_than_interval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FUNNEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(funnel_payload("onboarding", 1000, 100))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::default());
    let mut updates = poller.subscribe();

    poller.start_polling(Duration::from_millis(100)).unwrap();
    let state = wait_for_state(&mut updates, |s| s.successes >= 1).await;
    poller.stop_polling();

    assert_eq!(state.connection, ConnectionStatus::Connected);
    assert_eq!(state.data.map(|d| d.funnel.total_users), Some(1000));
    assert!(state.latest_issued > state.last_applied);
}

#[tokio::test]
async fn test_request_in_flight_at_stop_still_applies() {
    let server = MockServer::start().await;
    mount_funnel_once(&server, 1000, Duration::from_millis(300)).await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::default());
    let mut updates = poller.subscribe();

    poller.start_polling(Duration::from_secs(60)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(poller.snapshot().successes, 0);
    assert!(poller.stop_polling());

    let state = wait_for_state(&mut updates, |s| s.successes >= 1).await;
    assert_eq!(state.last_applied, 1);
    assert_eq!(state.latest_issued, 1);
    assert_eq!(shown_total_users(&poller), Some(1000));
}

#[tokio::test]
async fn test_dropping_poller_stops_ticks() {
    let server = MockServer::start().await;
    mount_funnel(&server, 1000).await;
    let poller = poller_for(&server, PollScope::FunnelOnly, SequencePolicy::LatestIssued);
    let mut updates = poller.subscribe();

    poller.start_polling(Duration::from_millis(50)).unwrap();
    wait_for_state(&mut updates, |s| s.successes >= 1).await;
    drop(poller);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_drop = requests_to(&server, FUNNEL_PATH).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(requests_to(&server, FUNNEL_PATH).await, after_drop);
}

#[tokio::test]
async fn test_polling_survives_failures() {
    let poller = FunnelPoller::new(
        unreachable_client(),
        "onboarding",
        PollScope::FunnelOnly,
        SequencePolicy::LatestIssued,
    );
    let mut updates = poller.subscribe();

    poller.start_polling(Duration::from_millis(50)).unwrap();
    let state = wait_for_state(&mut updates, |s| s.failures >= 3).await;

    assert_eq!(state.connection, ConnectionStatus::Error);
    assert!(poller.is_polling());
    poller.stop_polling();
}

#[tokio::test]
async fn test_insights_scope_fetches_everything() {
    let server = MockServer::start().await;
    mount_funnel(&server, 1000).await;
    Mock::given(method("GET"))
        .and(path("/recommendations/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendations_payload("onboarding")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ai/insights/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(insights_payload("onboarding")))
        .mount(&server)
        .await;
    let poller = poller_for(&server, PollScope::WithInsights, SequencePolicy::LatestIssued);

    assert_eq!(poller.refresh().await, ApplyOutcome::Applied);

    let data = poller.snapshot().data.expect("data after success");
    assert_eq!(data.funnel.total_users, 1000);
    assert_eq!(data.recommendations.map(|r| r.total_recommendations), Some(1));
    assert_eq!(data.insights.map(|i| i.insights.len()), Some(2));
}

#[tokio::test]
async fn test_insights_scope_fails_as_a_whole() {
    let server = MockServer::start().await;
    mount_funnel(&server, 1000).await;
    Mock::given(method("GET"))
        .and(path("/recommendations/onboarding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recommendations_payload("onboarding")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ai/insights/onboarding"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let poller = poller_for(&server, PollScope::WithInsights, SequencePolicy::LatestIssued);

    poller.refresh().await;

    let state = poller.snapshot();
    assert_eq!(state.connection, ConnectionStatus::Error);
    assert!(state.data.is_none());
    assert_eq!(state.failures, 1);
}
