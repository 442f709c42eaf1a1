//! Multi-region fan-out
//!
//! Runs the fixed regional checks against every enabled region on a bounded
//! rayon pool. Workers only read; results come back to the calling thread as
//! a region → outcome map and are folded into one report there.

use super::normalizer::normalize_recommendation;
use super::round_to;
use super::summary::sort_by_savings;
use crate::providers::{CloudProvider, SourceResult};
use crate::types::{
    FinopsError, MultiRegionReport, MultiRegionSummary, RawRecommendation, Recommendation, RegionInventory,
    RegionOutcome, RegionReport, ResourceSnapshot, Result,
};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Default number of concurrent region workers
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Used when the enabled-region lookup fails
pub const FALLBACK_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-southeast-1",
    "ap-northeast-1",
];

/// Identifier fragments that mark a database as non-production
const NON_PROD_MARKERS: &[&str] = &["dev", "test", "staging", "qa"];

/// Share of a Multi-AZ instance's cost saved by going Single-AZ
const MULTI_AZ_SAVINGS_RATIO: f64 = 0.5;

/// gp3 price used for volumes still attached to stopped instances
const STOPPED_VOLUME_GB_MONTH: f64 = 0.08;

/// Monthly USD per provisioned GB by EBS volume type
fn ebs_gb_month_price(volume_type: &str) -> f64 {
    match volume_type {
        "gp3" => 0.08,
        "io1" | "io2" => 0.125,
        "st1" => 0.045,
        "sc1" => 0.015,
        "standard" => 0.05,
        _ => 0.10, // gp2 and unknown
    }
}

fn is_non_production(identifier: &str) -> bool {
    let lower = identifier.to_lowercase();
    NON_PROD_MARKERS.iter().any(|m| lower.contains(m))
}

fn finding(kind: &str, resource: &str, priority: &str, savings: f64, service: &str, title: String) -> Recommendation {
    normalize_recommendation(&RawRecommendation {
        kind: Some(kind.to_string()),
        resource_id: Some(resource.to_string()),
        title: Some(title),
        priority: Some(priority.to_string()),
        savings: serde_json::Number::from_f64(round_to(savings, 2)).map(Value::Number),
        service: Some(service.to_string()),
        ..Default::default()
    })
}

/// The fixed regional checks over one region's inventory. Pure.
pub fn check_inventory(region: &str, inventory: &RegionInventory) -> RegionReport {
    let mut recommendations = Vec::new();

    for instance in inventory.instances.iter().filter(|i| i.state == "stopped") {
        recommendations.push(finding(
            "EC2_STOPPED",
            &instance.instance_id,
            "LOW",
            instance.attached_volume_gb as f64 * STOPPED_VOLUME_GB_MONTH,
            "EC2",
            format!(
                "Stopped instance {} in {} still pays for {} GB of EBS",
                instance.instance_id, region, instance.attached_volume_gb
            ),
        ));
    }

    for volume in inventory.volumes.iter().filter(|v| v.state == "available") {
        recommendations.push(finding(
            "EBS_ORPHAN",
            &volume.volume_id,
            "MEDIUM",
            volume.size_gb as f64 * ebs_gb_month_price(&volume.volume_type),
            "EBS",
            format!(
                "Unattached {} GB {} volume {} in {}",
                volume.size_gb, volume.volume_type, volume.volume_id, region
            ),
        ));
    }

    for db in inventory
        .db_instances
        .iter()
        .filter(|db| db.multi_az && is_non_production(&db.identifier))
    {
        recommendations.push(finding(
            "RDS_MULTI_AZ_NON_PROD",
            &db.identifier,
            "MEDIUM",
            db.monthly_cost.unwrap_or(0.0) * MULTI_AZ_SAVINGS_RATIO,
            "RDS",
            format!("Non-production database {} in {} runs Multi-AZ", db.identifier, region),
        ));
    }

    let mut resources = ResourceSnapshot::new();
    resources.insert("ec2_instances", inventory.instances.len());
    resources.insert("ebs_volumes", inventory.volumes.len());
    resources.insert("rds_instances", inventory.db_instances.len());
    resources.insert("lambda_functions", inventory.lambda_functions);
    resources.insert("s3_buckets", inventory.s3_buckets);

    RegionReport {
        resources,
        recommendations,
    }
}

/// Describe a region and run the checks on it
pub fn analyze_region(provider: &dyn CloudProvider, region: &str) -> SourceResult<RegionReport> {
    let inventory = provider.describe_region(region)?;
    Ok(check_inventory(region, &inventory))
}

/// Fold per-region outcomes into one report. Pure.
pub fn merge_outcomes(results: BTreeMap<String, SourceResult<RegionReport>>) -> MultiRegionReport {
    let mut regions = BTreeMap::new();
    let mut consolidated = Vec::new();
    let mut regions_with_resources = 0;

    for (region, result) in results {
        let outcome = match result {
            Ok(report) => {
                if report.resources.has_resources() {
                    regions_with_resources += 1;
                }
                consolidated.extend(report.recommendations.iter().cloned());
                RegionOutcome::Success(report)
            }
            Err(e) => RegionOutcome::Error { error: e.to_string() },
        };
        regions.insert(region, outcome);
    }

    sort_by_savings(&mut consolidated);

    let summary = MultiRegionSummary {
        total_regions: regions.len(),
        regions_with_resources,
        total_recommendations: consolidated.len(),
        total_potential_savings: round_to(consolidated.iter().map(|r| r.savings).sum(), 2),
    };

    MultiRegionReport {
        regions,
        summary,
        consolidated_recommendations: consolidated,
    }
}

/// Bounded fan-out over a provider's regions
pub struct RegionFanout<'a> {
    provider: &'a dyn CloudProvider,
    max_workers: usize,
}

impl<'a> RegionFanout<'a> {
    pub fn new(provider: &'a dyn CloudProvider, max_workers: usize) -> Self {
        Self {
            provider,
            max_workers: max_workers.max(1),
        }
    }

    /// Opted-in regions, or the fallback list when the lookup fails
    pub fn enabled_regions(&self) -> Vec<String> {
        match self.provider.enabled_regions() {
            Ok(regions) if !regions.is_empty() => regions,
            Ok(_) => {
                warn!("Provider reported no enabled regions, using fallback list");
                FALLBACK_REGIONS.iter().map(|r| r.to_string()).collect()
            }
            Err(e) => {
                warn!(error = %e, "Enabled-region lookup failed, using fallback list");
                FALLBACK_REGIONS.iter().map(|r| r.to_string()).collect()
            }
        }
    }

    /// Run the regional checks on every enabled region
    pub fn run(&self) -> Result<MultiRegionReport> {
        let regions = self.enabled_regions();
        let provider = self.provider;
        self.run_with(&regions, |region| analyze_region(provider, region))
    }

    /// Run `analyze` on each region with at most `max_workers` in flight.
    pub fn run_with<F>(&self, regions: &[String], analyze: F) -> Result<MultiRegionReport>
    where
        F: Fn(&str) -> SourceResult<RegionReport> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|i| format!("region-worker-{}", i))
            .build()
            .map_err(|e| FinopsError::Config(format!("cannot build region pool: {}", e)))?;

        info!(
            regions = regions.len(),
            workers = self.max_workers,
            "Starting multi-region analysis"
        );

        let results: Vec<(String, SourceResult<RegionReport>)> = pool.install(|| {
            regions
                .par_iter()
                .map(|region| {
                    let result = analyze(region.as_str());
                    match &result {
                        Ok(report) => debug!(
                            region = %region,
                            findings = report.recommendations.len(),
                            "Region analyzed"
                        ),
                        Err(e) => warn!(region = %region, error = %e, "Region analysis failed"),
                    }
                    (region.clone(), result)
                })
                .collect()
        });

        Ok(merge_outcomes(results.into_iter().collect()))
    }
}
