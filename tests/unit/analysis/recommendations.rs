use crate::common::{mock_funnel, step};
use funnel_watch::analysis::{by_priority, compute_funnel_analysis, derive_recommendations};
use funnel_watch::types::{FunnelAnalysisResult, FunnelHealth, Priority, RawStep};

#[test]
fn test_mock_funnel_recommendations() {
    let response = derive_recommendations(&mock_funnel());

    // Only the tutorial completion step crosses the elevated threshold
    assert_eq!(response.total_recommendations, 1);
    let rec = &response.recommendations[0];
    assert_eq!(rec.step, "Tutorial Complete");
    assert_eq!(rec.priority, Priority::Medium);
    assert_eq!(rec.issue, "High-risk drop-off rate of 33.33%");
    assert!(rec.recommendation.contains("tutorial complete"));
    assert_eq!(response.funnel_health, FunnelHealth::NeedsImprovement);
}

#[test]
fn test_severe_drop_offs_use_step_playbooks() {
    let steps = vec![
        RawStep::new("signup", 1000),
        RawStep::new("email_verified", 400),
        RawStep::new("tutorial_completed", 150),
        RawStep::new("first_action_taken", 60),
    ];
    let response = derive_recommendations(&compute_funnel_analysis("onboarding", "csv", &steps));

    let priorities: Vec<Priority> = response.recommendations.iter().map(|r| r.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::High, Priority::High, Priority::Critical]
    );
    assert_eq!(response.recommendations[0].expected_impact, "15-25% improvement");
    assert_eq!(response.recommendations[1].expected_impact, "20-30% improvement");
    assert_eq!(response.recommendations[2].expected_impact, "10-20% improvement");

    let overall = &response.recommendations[3];
    assert_eq!(overall.step, "Overall Funnel");
    assert_eq!(overall.issue, "Low overall conversion rate of 6.0%");
    assert_eq!(response.funnel_health, FunnelHealth::Critical);
}

#[test]
fn test_severe_drop_off_without_playbook_is_silent() {
    let steps = vec![
        RawStep::new("signup", 1000),
        RawStep::new("profile_setup", 900),
        RawStep::new("invite_team", 350),
    ];
    let response = derive_recommendations(&compute_funnel_analysis("onboarding", "csv", &steps));

    assert_eq!(response.total_recommendations, 0);
    assert_eq!(response.funnel_health, FunnelHealth::Good);
}

#[test]
fn test_by_priority_orders_critical_first() {
    let steps = vec![
        RawStep::new("signup", 1000),
        RawStep::new("email_verified", 400),
        RawStep::new("second_session", 100),
    ];
    let response = derive_recommendations(&compute_funnel_analysis("onboarding", "csv", &steps));
    let ordered = by_priority(&response);

    assert_eq!(ordered[0].priority, Priority::Critical);
    assert!(ordered.windows(2).all(|w| w[0].priority >= w[1].priority));
}

#[test]
fn test_issue_text_names_band_and_keeps_decimal_point() {
    let result = FunnelAnalysisResult {
        funnel_id: "onboarding".to_string(),
        final_conversion_rate: 25.0,
        analysis: vec![
            step("Signup", 0.0),
            step("Email Verified", 60.0),
            step("Profile Setup", 28.0),
        ],
        ..FunnelAnalysisResult::default()
    };
    let issues: Vec<String> = derive_recommendations(&result)
        .recommendations
        .into_iter()
        .map(|r| r.issue)
        .collect();

    assert_eq!(
        issues,
        vec![
            "High drop-off rate of 60.0% at email verification".to_string(),
            "Moderate drop-off rate of 28.0%".to_string(),
        ]
    );
}
