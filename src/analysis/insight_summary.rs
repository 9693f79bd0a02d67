//! Aggregates over AI insight collections

use crate::types::{ImpactLevel, InsightCollection, InsightItem, InsightType};
use crate::utils::math::mean;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts and ranking for one insight collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightSummary {
    pub total: usize,
    pub by_impact: BTreeMap<ImpactLevel, usize>,
    pub by_type: BTreeMap<InsightType, usize>,
    pub average_confidence: f64,
    /// Critical first, then by confidence, both descending
    pub ranked: Vec<InsightItem>,
}

impl InsightSummary {
    pub fn count(&self, level: ImpactLevel) -> usize {
        self.by_impact.get(&level).copied().unwrap_or(0)
    }

    /// Insights at high or critical impact
    pub fn urgent(&self) -> usize {
        self.count(ImpactLevel::High) + self.count(ImpactLevel::Critical)
    }
}

pub fn summarize_insights<C: InsightCollection + ?Sized>(collection: &C) -> InsightSummary {
    let items = collection.items();

    let mut by_impact = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    for item in items {
        *by_impact.entry(item.impact_level).or_insert(0) += 1;
        *by_type.entry(item.insight_type).or_insert(0) += 1;
    }

    InsightSummary {
        total: items.len(),
        by_impact,
        by_type,
        average_confidence: mean(items.iter().map(|i| i.confidence)),
        ranked: rank_insights(items),
    }
}

/// Order insights by impact level then confidence, highest first
///
/// The sort is stable, so equal insights keep backend order.
pub fn rank_insights(items: &[InsightItem]) -> Vec<InsightItem> {
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| {
        b.impact_level.cmp(&a.impact_level).then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    ranked
}
