//! Funnel analysis and report generation
//!
//! Everything here is pure: it takes backend payloads (or raw step counts)
//! and derives the figures the dashboard displays.
//!
//! - **Funnel Metrics** - Drop-off classification, averages, extremes, health
//! - **Recommendations** - Rule-based advice computed from a funnel analysis
//! - **Insight Summary** - Impact and type breakdown of AI insight collections
//! - **Report Generation** - Formatted output for console, JSON and CSV
//!
//! ## Usage
//!
//! ```rust
//! use funnel_watch::analysis::{classify_drop_off, compute_funnel_analysis, summarize_funnel, StepRisk};
//! use funnel_watch::types::RawStep;
//!
//! let steps = vec![
//!     RawStep::new("signup", 1000),
//!     RawStep::new("email_verified", 400),
//! ];
//! let result = compute_funnel_analysis("onboarding", "csv", &steps);
//! let summary = summarize_funnel(&result);
//! assert_eq!(summary.high_risk_steps, vec!["Email Verified".to_string()]);
//! assert_eq!(summary.final_conversion_rate, 40.0);
//! assert_eq!(classify_drop_off(result.analysis[1].drop_off_rate), StepRisk::High);
//! ```

pub mod funnel_metrics;
pub mod insight_summary;
pub mod recommendations;
pub mod reports;

// Re-export main types and interfaces
pub use funnel_metrics::{
    average_drop_off, biggest_drop_off, classify_drop_off, compute_funnel_analysis,
    display_step_name, funnel_health, high_risk_steps, smallest_drop_off, summarize_funnel,
    FunnelSummary, StepRisk,
};
pub use insight_summary::{rank_insights, summarize_insights, InsightSummary};
pub use recommendations::{by_priority, derive_recommendations};
pub use reports::{OutputFormat, ReportFormatter};
