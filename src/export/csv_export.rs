use crate::analysis::funnel_metrics::classify_drop_off;
use crate::errors::{AppError, AppResult};
use crate::types::{FunnelAnalysisResult, InsightItem, RawStep, StepResult};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// Separator between suggested actions in one insights cell
pub const ACTION_SEPARATOR: &str = "; ";

/// Line of the first data record; line 1 is the header
const FIRST_DATA_LINE: usize = 2;

#[derive(Debug, Serialize)]
struct FunnelRowOut<'a> {
    step: &'a str,
    count: u64,
    conversion_rate: String,
    drop_off_rate: String,
    risk: &'static str,
}

#[derive(Debug, Deserialize)]
struct FunnelRowIn {
    step: String,
    count: u64,
    conversion_rate: f64,
    drop_off_rate: f64,
}

#[derive(Debug, Serialize)]
struct InsightRow<'a> {
    insight_type: String,
    impact_level: String,
    confidence: String,
    description: &'a str,
    suggested_actions: String,
    created_at: String,
}

/// Write one row per funnel step, rates with two fixed decimals
///
/// The `risk` column comes from [`classify_drop_off`], the same
/// classification the console report uses.
pub fn write_funnel_csv<W: Write>(result: &FunnelAnalysisResult, writer: W) -> AppResult<usize> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for step in result.steps() {
        csv_writer.serialize(FunnelRowOut {
            step: &step.step,
            count: step.count,
            conversion_rate: format!("{:.2}", step.conversion_rate),
            drop_off_rate: format!("{:.2}", step.drop_off_rate),
            risk: classify_drop_off(step.drop_off_rate).label(),
        })?;
    }

    // An empty funnel still gets a header row
    if result.is_empty() {
        csv_writer.write_record(["step", "count", "conversion_rate", "drop_off_rate", "risk"])?;
    }

    csv_writer.flush()?;
    debug!("Wrote {} funnel rows", result.steps().len());
    Ok(result.steps().len())
}

/// Parse a funnel export back into step results
///
/// Step names are taken verbatim, so no comment or trim handling: a name may
/// start with `#`, carry surrounding spaces or be empty. The `risk` column is
/// ignored; it is always re-derived from the drop-off.
pub fn read_funnel_csv<R: Read>(reader: R) -> AppResult<Vec<StepResult>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut steps = Vec::new();
    for (index, row) in csv_reader.deserialize::<FunnelRowIn>().enumerate() {
        let row = row?;
        let line = index + FIRST_DATA_LINE;

        if !row.conversion_rate.is_finite() || !row.drop_off_rate.is_finite() {
            return Err(AppError::InvalidRecord {
                line,
                reason: format!("non-finite rate for step '{}'", row.step),
            });
        }

        steps.push(StepResult {
            step: row.step,
            count: row.count,
            conversion_rate: row.conversion_rate,
            drop_off_rate: row.drop_off_rate,
        });
    }

    Ok(steps)
}

/// Write one row per insight, suggested actions joined with `; `
pub fn write_insights_csv<W: Write>(items: &[InsightItem], writer: W) -> AppResult<usize> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for item in items {
        csv_writer.serialize(InsightRow {
            insight_type: item.insight_type.to_string(),
            impact_level: item.impact_level.to_string(),
            confidence: format!("{:.2}", item.confidence),
            description: &item.description,
            suggested_actions: item.suggested_actions.join(ACTION_SEPARATOR),
            created_at: item
                .created_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        })?;
    }

    if items.is_empty() {
        csv_writer.write_record([
            "insight_type",
            "impact_level",
            "confidence",
            "description",
            "suggested_actions",
            "created_at",
        ])?;
    }

    csv_writer.flush()?;
    Ok(items.len())
}

/// Read `name,count` rows for offline funnel computation
pub fn read_step_counts_csv<R: Read>(reader: R) -> AppResult<Vec<RawStep>> {
    let mut csv_reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut steps = Vec::new();
    for (index, row) in csv_reader.deserialize::<RawStep>().enumerate() {
        let row = row?;
        if row.name.is_empty() {
            return Err(AppError::InvalidRecord {
                line: index + FIRST_DATA_LINE,
                reason: "empty step name".to_string(),
            });
        }
        steps.push(row);
    }

    if steps.is_empty() {
        return Err(AppError::InvalidData(
            "step counts file has no data rows".to_string(),
        ));
    }

    Ok(steps)
}
