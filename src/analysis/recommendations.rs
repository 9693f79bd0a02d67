//! Rule-based recommendations computed locally from a funnel analysis
//!
//! Mirrors what `/recommendations/{funnel_id}` returns, so the dashboard can
//! still advise when only the funnel endpoint is reachable.

use crate::analysis::funnel_metrics::{classify_drop_off, funnel_health, StepRisk};
use crate::types::{FunnelAnalysisResult, Priority, Recommendation, RecommendationsResponse};

/// Drop-off above this on a known step earns a high-priority recommendation
pub const SEVERE_DROP_OFF: f64 = 50.0;

/// Drop-off above this earns a medium-priority recommendation
pub const ELEVATED_DROP_OFF: f64 = 25.0;

/// Final conversion below this adds a critical whole-funnel recommendation
pub const LOW_FINAL_CONVERSION: f64 = 20.0;

struct StepPlaybook {
    keyword: &'static str,
    issue_suffix: &'static str,
    recommendation: &'static str,
    expected_impact: &'static str,
}

const PLAYBOOKS: [StepPlaybook; 3] = [
    StepPlaybook {
        keyword: "email",
        issue_suffix: "at email verification",
        recommendation: "Implement email verification reminders, simplify the verification process, or consider social login options",
        expected_impact: "15-25% improvement",
    },
    StepPlaybook {
        keyword: "tutorial",
        issue_suffix: "during tutorial",
        recommendation: "Shorten tutorial length, make it interactive, add progress indicators, or make it skippable",
        expected_impact: "20-30% improvement",
    },
    StepPlaybook {
        keyword: "first action",
        issue_suffix: "at first action",
        recommendation: "Provide clearer guidance, implement user onboarding tooltips, or simplify the first action",
        expected_impact: "10-20% improvement",
    },
];

/// Severity word for an issue line, taken from the step's risk band
fn severity(rate: f64) -> &'static str {
    match classify_drop_off(rate) {
        StepRisk::High => "High-risk",
        StepRisk::Moderate => "Moderate",
        StepRisk::Low => "Low",
    }
}

/// Derive recommendations for every step plus the funnel as a whole
///
/// A severe drop-off on a step that matches no playbook produces nothing;
/// only the named onboarding steps have tailored advice.
pub fn derive_recommendations(result: &FunnelAnalysisResult) -> RecommendationsResponse {
    let mut recommendations: Vec<Recommendation> = result
        .steps()
        .iter()
        .filter_map(|step| {
            let step_name = step.step.to_lowercase();
            let rate = step.drop_off_rate;

            if rate > SEVERE_DROP_OFF {
                PLAYBOOKS
                    .iter()
                    .find(|p| step_name.contains(p.keyword))
                    .map(|p| Recommendation {
                        step: step.step.clone(),
                        priority: Priority::High,
                        issue: format!("High drop-off rate of {:?}% {}", rate, p.issue_suffix),
                        recommendation: p.recommendation.to_string(),
                        expected_impact: p.expected_impact.to_string(),
                    })
            } else if rate > ELEVATED_DROP_OFF {
                Some(Recommendation {
                    step: step.step.clone(),
                    priority: Priority::Medium,
                    issue: format!("{} drop-off rate of {:?}%", severity(rate), rate),
                    recommendation: format!(
                        "Optimize the {} experience with A/B testing and user feedback collection",
                        step_name
                    ),
                    expected_impact: "5-15% improvement".to_string(),
                })
            } else {
                None
            }
        })
        .collect();

    let final_conversion = result.final_conversion_rate;
    if final_conversion < LOW_FINAL_CONVERSION {
        recommendations.push(Recommendation {
            step: "Overall Funnel".to_string(),
            priority: Priority::Critical,
            issue: format!("Low overall conversion rate of {:?}%", final_conversion),
            recommendation: "Conduct comprehensive user research, implement exit-intent surveys, and consider redesigning the entire onboarding flow".to_string(),
            expected_impact: "25-50% improvement".to_string(),
        });
    }

    RecommendationsResponse {
        funnel_id: result.funnel_id.clone(),
        total_recommendations: recommendations.len(),
        recommendations,
        funnel_health: funnel_health(final_conversion),
    }
}

/// Recommendations ordered most urgent first, stable within a priority
pub fn by_priority(response: &RecommendationsResponse) -> Vec<&Recommendation> {
    let mut ordered: Vec<&Recommendation> = response.recommendations.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
    ordered
}
