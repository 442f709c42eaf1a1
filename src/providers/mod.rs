//! Cloud provider seam and the per-service analyzer contract

mod snapshot;

pub use snapshot::{AccountSnapshot, FailureKind, RecordedAnalyzerOutput, RecordedFailure, SnapshotProvider};

use crate::types::{DatePeriod, RawRecommendation, RegionInventory, ResourceSnapshot, SourceError};
use serde::{Deserialize, Serialize};

/// Result of a single read-only provider call
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Secondary recommendation sources, queried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisor {
    /// Compute rightsizing advisor
    ComputeOptimizer,
    /// Reservation / Savings Plan purchase advisor
    Reservations,
    /// Support-plan checks advisor
    TrustedAdvisor,
    /// Generated insight advisor
    AiInsights,
}

impl Advisor {
    pub const ALL: [Advisor; 4] = [
        Advisor::ComputeOptimizer,
        Advisor::Reservations,
        Advisor::TrustedAdvisor,
        Advisor::AiInsights,
    ];

    /// Integration flag / snapshot key
    pub fn key(&self) -> &'static str {
        match self {
            Advisor::ComputeOptimizer => "compute_optimizer",
            Advisor::Reservations => "reservations",
            Advisor::TrustedAdvisor => "trusted_advisor",
            Advisor::AiInsights => "ai_insights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostMetric {
    UnblendedCost,
    AmortizedCost,
}

/// Billing query issued by the cost retriever
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub period: DatePeriod,
    pub granularity: Granularity,
    pub metric: CostMetric,
    /// Dimension to group by (e.g. `SERVICE`)
    pub group_by: String,
}

/// One group row of a billing response (one service, one period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroup {
    pub service: String,
    pub amount: f64,
}

/// What an all-services analyzer collection returns for a region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerOutput {
    pub recommendations: Vec<RawRecommendation>,
    pub resources: ResourceSnapshot,
}

/// The collection of per-service analyzers, run for one region.
pub trait ServiceAnalyzer: Send + Sync {
    fn analyze(&self, region: &str) -> SourceResult<AnalyzerOutput>;
}

impl<F> ServiceAnalyzer for F
where
    F: Fn(&str) -> SourceResult<AnalyzerOutput> + Send + Sync,
{
    fn analyze(&self, region: &str) -> SourceResult<AnalyzerOutput> {
        self(region)
    }
}

/// Read-only access to one cloud account.
pub trait CloudProvider: Send + Sync {
    /// Provider name used in logs (e.g. "snapshot")
    fn name(&self) -> &str;

    fn account_id(&self) -> SourceResult<String>;

    fn cost_and_usage(&self, query: &CostQuery) -> SourceResult<Vec<CostGroup>>;

    /// Regions the account has opted into
    fn enabled_regions(&self) -> SourceResult<Vec<String>>;

    fn describe_region(&self, region: &str) -> SourceResult<RegionInventory>;

    fn advisor_recommendations(
        &self,
        advisor: Advisor,
        region: &str,
    ) -> SourceResult<Vec<RawRecommendation>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_order_and_keys() {
        let keys: Vec<&str> = Advisor::ALL.iter().map(|a| a.key()).collect();
        assert_eq!(
            keys,
            vec![
                "compute_optimizer",
                "reservations",
                "trusted_advisor",
                "ai_insights"
            ]
        );
    }

    #[test]
    fn test_closure_is_service_analyzer() {
        let analyzer = |region: &str| -> SourceResult<AnalyzerOutput> {
            let mut resources = ResourceSnapshot::new();
            resources.insert(format!("{}_marker", region), 1i64);
            Ok(AnalyzerOutput {
                recommendations: Vec::new(),
                resources,
            })
        };

        let out = analyzer.analyze("eu-west-1").unwrap();
        assert!(out.resources.get("eu-west-1_marker").is_some());
    }
}
