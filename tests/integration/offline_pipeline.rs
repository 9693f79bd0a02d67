use crate::common::MOCK_COUNTS;
use funnel_watch::analysis::{
    compute_funnel_analysis, derive_recommendations, summarize_funnel, OutputFormat,
    ReportFormatter,
};
use funnel_watch::export::{
    create_export_file, export_file_path, read_funnel_csv, read_step_counts_csv, write_funnel_csv,
};
use funnel_watch::types::{FunnelHealth, Priority};
use chrono::{TimeZone, Utc};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use tempfile::TempDir;

fn write_step_counts(dir: &TempDir) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join("steps.csv");
    let mut file = File::create(&path)?;
    writeln!(file, "# exported from the events table")?;
    writeln!(file, "name,count")?;
    for (name, count) in MOCK_COUNTS {
        writeln!(file, "{}, {}", name, count)?;
    }
    Ok(path)
}

#[test]
fn test_counts_to_csv_export_and_back() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = write_step_counts(&dir)?;

    let steps = read_step_counts_csv(BufReader::new(File::open(&input)?))?;
    assert_eq!(steps.len(), MOCK_COUNTS.len());

    let result = compute_funnel_analysis("onboarding", "CSV", &steps);
    assert_eq!(result.total_users, 1000);
    assert_eq!(result.final_conversion_rate, 30.0);

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let out_path = export_file_path(&dir.path().join("exports"), "onboarding", "funnel", at);
    {
        let writer = create_export_file(&out_path)?;
        assert_eq!(write_funnel_csv(&result, writer)?, 5);
    }
    assert!(out_path.ends_with("exports/onboarding_funnel_20240501_093000.csv"));

    let exported = fs::read_to_string(&out_path)?;
    assert!(exported.contains("Tutorial Complete,400,40.00,33.33,high-risk"));

    let parsed = read_funnel_csv(File::open(&out_path)?)?;
    assert_eq!(parsed, result.analysis);
    Ok(())
}

#[test]
fn test_counts_to_summary_and_recommendations() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = write_step_counts(&dir)?;
    let steps = read_step_counts_csv(File::open(&input)?)?;
    let result = compute_funnel_analysis("onboarding", "CSV", &steps);

    let summary = summarize_funnel(&result);
    assert_eq!(summary.biggest_drop_off_step.as_deref(), Some("Tutorial Complete"));
    assert_eq!(summary.high_risk_steps, vec!["Tutorial Complete".to_string()]);
    assert_eq!(summary.health, FunnelHealth::NeedsImprovement);

    let recommendations = derive_recommendations(&result);
    assert_eq!(recommendations.total_recommendations, 1);
    assert_eq!(recommendations.recommendations[0].step, "Tutorial Complete");
    assert_eq!(recommendations.recommendations[0].priority, Priority::Medium);
    assert_eq!(recommendations.funnel_health, FunnelHealth::NeedsImprovement);

    let report = ReportFormatter::format_funnel(&result, &OutputFormat::Console)?;
    assert!(report.contains("Tutorial Complete"));
    assert!(report.contains("1,000"));
    Ok(())
}
