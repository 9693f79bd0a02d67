use serde::{Deserialize, Serialize};

/// Result of `GET /funnel/{funnel_id}`
///
/// `analysis` is in funnel order; rates are percentages the backend already
/// computed and are not range-checked here.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelAnalysisResult {
    pub funnel_id: String,
    pub data_source: String,
    pub total_users: u64,
    pub final_conversion_rate: f64,
    pub analysis: Vec<StepResult>,
    pub raw_steps: Vec<RawStep>,
    pub total_steps: usize,
    pub posthog_configured: bool,
}

/// One step of a funnel analysis
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepResult {
    pub step: String,
    pub count: u64,
    pub conversion_rate: f64,
    pub drop_off_rate: f64,
}

/// Event name with its observed count, before any rate is derived
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStep {
    pub name: String,
    pub count: u64,
}

impl RawStep {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl FunnelAnalysisResult {
    /// Steps in funnel order
    pub fn steps(&self) -> &[StepResult] {
        &self.analysis
    }

    pub fn is_empty(&self) -> bool {
        self.analysis.is_empty()
    }
}
