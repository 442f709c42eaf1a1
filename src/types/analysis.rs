//! Analysis result types

use super::{CostSnapshot, Recommendation, ResourceSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which data sources contributed to a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Integrations(BTreeMap<String, bool>);

impl Integrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: impl Into<String>, ok: bool) {
        self.0.insert(source.into(), ok);
    }

    /// `None` when the source never reported (skipped silently)
    pub fn get(&self, source: &str) -> Option<bool> {
        self.0.get(source).copied()
    }

    pub fn is_active(&self, source: &str) -> bool {
        self.get(source).unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.0.values().filter(|ok| **ok).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &bool)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_cost: f64,
    pub total_potential_savings: f64,
    pub savings_percentage: f64,
    pub priority_counts: PriorityCounts,
    pub recommendation_count: usize,
    pub integrations_active: usize,
    pub top_opportunity: Option<Recommendation>,
}

/// Per-region findings from the fan-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub resources: ResourceSnapshot,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegionOutcome {
    Success(RegionReport),
    Error { error: String },
}

impl RegionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegionOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiRegionSummary {
    pub total_regions: usize,
    pub regions_with_resources: usize,
    pub total_recommendations: usize,
    pub total_potential_savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiRegionReport {
    pub regions: BTreeMap<String, RegionOutcome>,
    pub summary: MultiRegionSummary,
    /// All successful regions' findings, sorted descending by savings
    pub consolidated_recommendations: Vec<Recommendation>,
}

/// Output of one aggregation run; the unit held by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub account_id: String,
    pub region: String,
    pub generated_at: DateTime<Utc>,
    pub costs: CostSnapshot,
    pub resources: ResourceSnapshot,
    pub recommendations: Vec<Recommendation>,
    pub integrations: Integrations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_region: Option<MultiRegionReport>,
    pub summary: AnalysisSummary,
}
