//! Funnel metrics derived from step results
//!
//! Every view that labels a step as risky goes through [`classify_drop_off`]:
//! the console report, the CSV risk column and the severity word of a
//! medium-priority recommendation. The recommendation priorities themselves
//! follow their own 50 / 25 / 20 thresholds.

use crate::types::{FunnelAnalysisResult, FunnelHealth, RawStep, StepResult};
use crate::utils::math::{mean, round_to, safe_percentage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drop-off above this is high risk
pub const HIGH_RISK_DROP_OFF: f64 = 30.0;

/// Drop-off above this (and not high risk) is moderate risk
pub const MODERATE_RISK_DROP_OFF: f64 = 15.0;

/// Final conversion above this is a healthy funnel
pub const GOOD_CONVERSION: f64 = 30.0;

/// Final conversion above this (and not good) needs improvement
pub const FAIR_CONVERSION: f64 = 15.0;

/// Decimal places the backend rounds rates to
pub const RATE_PRECISION: u32 = 2;

/// Risk band of a single funnel step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRisk {
    Low,
    Moderate,
    High,
}

impl StepRisk {
    pub fn is_high_risk(self) -> bool {
        self == StepRisk::High
    }

    pub fn label(self) -> &'static str {
        match self {
            StepRisk::Low => "low",
            StepRisk::Moderate => "moderate",
            StepRisk::High => "high-risk",
        }
    }
}

impl fmt::Display for StepRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Classify a drop-off percentage
///
/// # Examples
/// ```
/// use funnel_watch::analysis::funnel_metrics::{classify_drop_off, StepRisk};
///
/// assert_eq!(classify_drop_off(45.0), StepRisk::High);
/// assert_eq!(classify_drop_off(30.0), StepRisk::Moderate);
/// assert_eq!(classify_drop_off(10.0), StepRisk::Low);
/// ```
pub fn classify_drop_off(drop_off_rate: f64) -> StepRisk {
    if drop_off_rate > HIGH_RISK_DROP_OFF {
        StepRisk::High
    } else if drop_off_rate > MODERATE_RISK_DROP_OFF {
        StepRisk::Moderate
    } else {
        StepRisk::Low
    }
}

/// Mean of every step's drop-off rate, 0.0 for an empty funnel
pub fn average_drop_off(steps: &[StepResult]) -> f64 {
    mean(steps.iter().map(|s| s.drop_off_rate))
}

/// Step with the largest drop-off; the earliest step wins a tie
pub fn biggest_drop_off(steps: &[StepResult]) -> Option<&StepResult> {
    steps.iter().fold(None, |best: Option<&StepResult>, step| match best {
        Some(b) if b.drop_off_rate >= step.drop_off_rate => Some(b),
        _ => Some(step),
    })
}

/// Step with the smallest drop-off; the earliest step wins a tie
pub fn smallest_drop_off(steps: &[StepResult]) -> Option<&StepResult> {
    steps.iter().fold(None, |best: Option<&StepResult>, step| match best {
        Some(b) if b.drop_off_rate <= step.drop_off_rate => Some(b),
        _ => Some(step),
    })
}

/// Steps whose drop-off classifies as high risk, in funnel order
pub fn high_risk_steps(steps: &[StepResult]) -> Vec<&StepResult> {
    steps
        .iter()
        .filter(|s| classify_drop_off(s.drop_off_rate).is_high_risk())
        .collect()
}

/// Verdict on the funnel's final conversion rate
pub fn funnel_health(final_conversion_rate: f64) -> FunnelHealth {
    if final_conversion_rate > GOOD_CONVERSION {
        FunnelHealth::Good
    } else if final_conversion_rate > FAIR_CONVERSION {
        FunnelHealth::NeedsImprovement
    } else {
        FunnelHealth::Critical
    }
}

/// Headline figures for one funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelSummary {
    pub funnel_id: String,
    pub data_source: String,
    pub step_count: usize,
    pub total_users: u64,
    pub final_conversion_rate: f64,
    pub average_drop_off: f64,
    pub biggest_drop_off_step: Option<String>,
    pub biggest_drop_off_rate: f64,
    pub high_risk_steps: Vec<String>,
    pub health: FunnelHealth,
}

pub fn summarize_funnel(result: &FunnelAnalysisResult) -> FunnelSummary {
    let steps = result.steps();
    let biggest = biggest_drop_off(steps);

    FunnelSummary {
        funnel_id: result.funnel_id.clone(),
        data_source: result.data_source.clone(),
        step_count: steps.len(),
        total_users: result.total_users,
        final_conversion_rate: result.final_conversion_rate,
        average_drop_off: average_drop_off(steps),
        biggest_drop_off_step: biggest.map(|s| s.step.clone()),
        biggest_drop_off_rate: biggest.map(|s| s.drop_off_rate).unwrap_or(0.0),
        high_risk_steps: high_risk_steps(steps)
            .into_iter()
            .map(|s| s.step.clone())
            .collect(),
        health: funnel_health(result.final_conversion_rate),
    }
}

/// `email_verified` -> `Email Verified`
///
/// Underscores become spaces, each run of letters starts upper case and
/// continues lower case, so `step2go` -> `Step2Go` and `a__b` -> `A  B`.
pub fn display_step_name(event_name: &str) -> String {
    let mut out = String::with_capacity(event_name.len());
    let mut after_letter = false;
    for c in event_name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}

/// Build a funnel analysis from raw event counts
///
/// Conversion is measured against the first step, drop-off against the
/// previous step (the first step has none). Rates are rounded to
/// [`RATE_PRECISION`] places.
pub fn compute_funnel_analysis(
    funnel_id: &str,
    data_source: &str,
    raw_steps: &[RawStep],
) -> FunnelAnalysisResult {
    let total_users = raw_steps.first().map(|s| s.count).unwrap_or(0);

    let analysis = raw_steps
        .iter()
        .enumerate()
        .map(|(i, current)| {
            // A later step can outnumber its predecessor; that is a negative drop-off
            let drop_off_rate = match i.checked_sub(1).map(|p| &raw_steps[p]) {
                Some(prev) if prev.count > 0 => {
                    (prev.count as f64 - current.count as f64) / prev.count as f64 * 100.0
                }
                _ => 0.0,
            };
            let conversion_rate = safe_percentage(current.count, total_users);
            StepResult {
                step: display_step_name(&current.name),
                count: current.count,
                conversion_rate: round_to(conversion_rate, RATE_PRECISION),
                drop_off_rate: round_to(drop_off_rate, RATE_PRECISION),
            }
        })
        .collect();

    let final_conversion_rate = raw_steps
        .last()
        .map(|last| round_to(safe_percentage(last.count, total_users), RATE_PRECISION))
        .unwrap_or(0.0);

    FunnelAnalysisResult {
        funnel_id: funnel_id.to_string(),
        data_source: data_source.to_string(),
        total_users,
        final_conversion_rate,
        analysis,
        raw_steps: raw_steps.to_vec(),
        total_steps: raw_steps.len(),
        posthog_configured: false,
    }
}
