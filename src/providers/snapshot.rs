//! Provider backed by a recorded account snapshot
//!
//! A snapshot is a JSON document holding the answers a live account gave to
//! the read-only calls the pipeline makes. Sections that were never recorded
//! behave like a service that is not enabled; the `failures` section replays
//! specific errors for a source key.

use super::{Advisor, AnalyzerOutput, CloudProvider, CostGroup, CostQuery, ServiceAnalyzer, SourceResult};
use crate::types::{FinopsError, RawRecommendation, RegionInventory, ResourceSnapshot, Result, SourceError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AccessDenied,
    NotEnabled,
    Throttled,
    Unavailable,
    Misconfigured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&RecordedFailure> for SourceError {
    fn from(f: &RecordedFailure) -> Self {
        let message = f.message.clone();
        match f.kind {
            FailureKind::AccessDenied => SourceError::AccessDenied(message),
            FailureKind::NotEnabled => SourceError::NotEnabled(message),
            FailureKind::Throttled => SourceError::Throttled(message),
            FailureKind::Unavailable => SourceError::Unavailable(message),
            FailureKind::Misconfigured => SourceError::Misconfigured(message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnalyzerOutput {
    #[serde(default)]
    pub recommendations: Vec<RawRecommendation>,
    #[serde(default)]
    pub resources: ResourceSnapshot,
}

/// On-disk snapshot document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub enabled_regions: Option<Vec<String>>,
    #[serde(default)]
    pub costs: Option<Vec<CostGroup>>,
    /// Region → inventory for the regional checks
    #[serde(default)]
    pub regions: BTreeMap<String, RegionInventory>,
    /// Region → all-services analyzer output
    #[serde(default)]
    pub services: BTreeMap<String, RecordedAnalyzerOutput>,
    /// Advisor key → recommendations
    #[serde(default)]
    pub advisors: BTreeMap<String, Vec<RawRecommendation>>,
    /// Source key → failure to replay. Keys: `account`, `cost_explorer`,
    /// `enabled_regions`, `all_services`, an advisor key, or `region:<name>`.
    #[serde(default)]
    pub failures: BTreeMap<String, RecordedFailure>,
}

pub struct SnapshotProvider {
    snapshot: AccountSnapshot,
}

impl SnapshotProvider {
    pub fn from_snapshot(snapshot: AccountSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: AccountSnapshot = serde_json::from_str(&content).map_err(|e| {
            FinopsError::Parse(format!("invalid snapshot {}: {}", path.display(), e))
        })?;
        debug!(
            path = %path.display(),
            regions = snapshot.regions.len(),
            "Loaded account snapshot"
        );
        Ok(Self { snapshot })
    }

    fn replay_failure(&self, key: &str) -> SourceResult<()> {
        match self.snapshot.failures.get(key) {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }
}

impl CloudProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn account_id(&self) -> SourceResult<String> {
        self.replay_failure("account")?;
        self.snapshot
            .account_id
            .clone()
            .ok_or_else(|| SourceError::Unavailable("account id not recorded".into()))
    }

    fn cost_and_usage(&self, query: &CostQuery) -> SourceResult<Vec<CostGroup>> {
        self.replay_failure("cost_explorer")?;
        debug!(
            start = %query.period.start,
            end = %query.period.end,
            group_by = %query.group_by,
            "Replaying cost and usage"
        );
        self.snapshot
            .costs
            .clone()
            .ok_or_else(|| SourceError::NotEnabled("billing data not recorded".into()))
    }

    fn enabled_regions(&self) -> SourceResult<Vec<String>> {
        self.replay_failure("enabled_regions")?;
        self.snapshot
            .enabled_regions
            .clone()
            .ok_or_else(|| SourceError::Unavailable("enabled regions not recorded".into()))
    }

    fn describe_region(&self, region: &str) -> SourceResult<RegionInventory> {
        self.replay_failure(&format!("region:{}", region))?;
        self.snapshot
            .regions
            .get(region)
            .cloned()
            .ok_or_else(|| SourceError::NotEnabled(format!("no inventory recorded for {}", region)))
    }

    fn advisor_recommendations(
        &self,
        advisor: Advisor,
        _region: &str,
    ) -> SourceResult<Vec<RawRecommendation>> {
        self.replay_failure(advisor.key())?;
        self.snapshot
            .advisors
            .get(advisor.key())
            .cloned()
            .ok_or_else(|| SourceError::NotEnabled(format!("{} not recorded", advisor.key())))
    }
}

impl ServiceAnalyzer for SnapshotProvider {
    fn analyze(&self, region: &str) -> SourceResult<AnalyzerOutput> {
        self.replay_failure("all_services")?;
        let recorded = self.snapshot.services.get(region).ok_or_else(|| {
            SourceError::NotEnabled(format!("no service analysis recorded for {}", region))
        })?;
        Ok(AnalyzerOutput {
            recommendations: recorded.recommendations.clone(),
            resources: recorded.resources.clone(),
        })
    }
}
