use crate::common::insights_payload;
use funnel_watch::analysis::{rank_insights, summarize_insights};
use funnel_watch::types::{
    CollaborationReport, ImpactLevel, InsightCollection, InsightItem, InsightType,
    InsightsResponse,
};

fn item(kind: InsightType, level: ImpactLevel, confidence: f64) -> InsightItem {
    InsightItem {
        insight_type: kind,
        impact_level: level,
        confidence,
        description: format!("{} {}", kind, level),
        ..InsightItem::default()
    }
}

#[test]
fn test_summary_of_backend_payload() -> anyhow::Result<()> {
    let response: InsightsResponse = serde_json::from_value(insights_payload("onboarding"))?;
    let summary = summarize_insights(&response);

    assert_eq!(summary.total, 2);
    assert_eq!(summary.count(ImpactLevel::Critical), 1);
    assert_eq!(summary.count(ImpactLevel::Medium), 1);
    assert_eq!(summary.count(ImpactLevel::Low), 0);
    assert_eq!(summary.urgent(), 1);
    assert_eq!(summary.by_type.get(&InsightType::Anomaly), Some(&1));
    assert!((summary.average_confidence - 0.775).abs() < 1e-9);
    assert_eq!(summary.ranked[0].impact_level, ImpactLevel::Critical);
    Ok(())
}

#[test]
fn test_ranking_is_impact_then_confidence() {
    let items = vec![
        item(InsightType::Pattern, ImpactLevel::Medium, 0.9),
        item(InsightType::Anomaly, ImpactLevel::High, 0.5),
        item(InsightType::Prediction, ImpactLevel::High, 0.8),
        item(InsightType::Unknown, ImpactLevel::Unknown, 1.0),
    ];
    let ranked = rank_insights(&items);
    let order: Vec<InsightType> = ranked.iter().map(|i| i.insight_type).collect();

    assert_eq!(
        order,
        vec![
            InsightType::Prediction,
            InsightType::Anomaly,
            InsightType::Pattern,
            InsightType::Unknown
        ]
    );
}

#[test]
fn test_empty_collection() {
    let summary = summarize_insights(&Vec::<InsightItem>::new());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.average_confidence, 0.0);
    assert!(summary.ranked.is_empty());
}

#[test]
fn test_collaboration_report_is_a_collection() {
    let report = CollaborationReport {
        top_insights: vec![item(InsightType::Optimization, ImpactLevel::High, 0.7)],
        ..CollaborationReport::default()
    };
    assert_eq!(report.items().len(), 1);
    assert_eq!(summarize_insights(&report).urgent(), 1);
}
