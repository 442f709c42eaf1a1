//! Aggregator service: one full analysis run
//!
//! Stages run in a fixed order (costs, all-services analyzer, advisors,
//! optional multi-region, dedup, sort, summary). Each data source is its own
//! failure boundary; see [`Aggregator::absorb`].

use super::cost::CostRetriever;
use super::dedup::dedup_by_savings;
use super::normalizer::normalize_all;
use super::regions::{RegionFanout, DEFAULT_MAX_WORKERS};
use super::summary::{sort_by_savings, summarize};
use crate::providers::{Advisor, CloudProvider, ServiceAnalyzer, SourceResult};
use crate::types::{
    AnalysisResult, FinopsError, Integrations, MultiRegionReport, Recommendation, ResourceSnapshot, Result,
    SourceError,
};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Integration flag for the billing source
pub const COST_EXPLORER: &str = "cost_explorer";
/// Integration flag for the all-services analyzer collection
pub const ALL_SERVICES: &str = "all_services";
/// Integration flag for the multi-region fan-out
pub const MULTI_REGION: &str = "multi_region";

const UNKNOWN_ACCOUNT: &str = "Unknown";

/// Aggregator for one provider account
pub struct Aggregator<'a> {
    provider: &'a dyn CloudProvider,
    max_workers: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(provider: &'a dyn CloudProvider) -> Self {
        Self {
            provider,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    /// Worker bound for the multi-region fan-out
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Run every stage and assemble an immutable result.
    ///
    /// Operational source failures are absorbed; only a source reporting
    /// `Misconfigured` makes this return `Err`.
    pub fn run_analysis(
        &self,
        region: &str,
        all_services: Option<&dyn ServiceAnalyzer>,
        include_multi_region: bool,
    ) -> Result<AnalysisResult> {
        info!(region, include_multi_region, provider = self.provider.name(), "Starting analysis");

        let mut integrations = Integrations::new();
        let mut recommendations: Vec<Recommendation> = Vec::new();
        let mut resources = ResourceSnapshot::new();

        // 1. Costs
        let costs = CostRetriever::new(self.provider).retrieve();
        integrations.set(COST_EXPLORER, costs.is_available());

        // 2. All-services analyzer: skipped silently on failure, no flag
        if let Some(analyzer) = all_services {
            if let Some(output) = self.absorb(ALL_SERVICES, analyzer.analyze(region))? {
                debug!(
                    findings = output.recommendations.len(),
                    counters = output.resources.len(),
                    "All-services analysis collected"
                );
                recommendations.extend(normalize_all(&output.recommendations));
                resources.merge(output.resources);
                integrations.set(ALL_SERVICES, true);
            }
        }

        // 3. Secondary advisors, sequentially
        for advisor in Advisor::ALL {
            let result = self.provider.advisor_recommendations(advisor, region);
            match self.absorb(advisor.key(), result)? {
                Some(raw) => {
                    recommendations.extend(normalize_all(&raw));
                    integrations.set(advisor.key(), true);
                }
                None => integrations.set(advisor.key(), false),
            }
        }

        // 4. Multi-region fan-out
        let multi_region = if include_multi_region {
            let report = self.absorb_fanout(RegionFanout::new(self.provider, self.max_workers).run());
            integrations.set(MULTI_REGION, report.is_some());
            if let Some(report) = &report {
                recommendations.extend(report.consolidated_recommendations.iter().cloned());
            }
            report
        } else {
            None
        };

        // 5-7. Dedup, sort, summarize
        let before = recommendations.len();
        let mut recommendations = dedup_by_savings(recommendations);
        sort_by_savings(&mut recommendations);
        let summary = summarize(&recommendations, &costs, &integrations);

        // 8. Account id is best-effort
        let account_id = self.provider.account_id().unwrap_or_else(|e| {
            warn!(error = %e, "Account id lookup failed");
            UNKNOWN_ACCOUNT.to_string()
        });

        info!(
            findings = recommendations.len(),
            duplicates = before - recommendations.len(),
            total_potential_savings = summary.total_potential_savings,
            integrations_active = summary.integrations_active,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            account_id,
            region: region.to_string(),
            generated_at: Utc::now(),
            costs,
            resources,
            recommendations,
            integrations,
            multi_region,
            summary,
        })
    }

    /// The single skip-or-propagate decision for a data source.
    fn absorb<T>(&self, source: &str, result: SourceResult<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(SourceError::Misconfigured(message)) => Err(FinopsError::Misconfigured {
                source_name: source.to_string(),
                message,
            }),
            Err(e) => {
                warn!(source, error = %e, "Source skipped");
                Ok(None)
            }
        }
    }

    /// A fan-out that cannot start drops only the multi-region stage.
    fn absorb_fanout(&self, result: Result<MultiRegionReport>) -> Option<MultiRegionReport> {
        match result {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(source = MULTI_REGION, error = %e, "Multi-region scan skipped");
                None
            }
        }
    }
}
