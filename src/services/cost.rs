//! Cost retrieval service
//!
//! Queries billing for the trailing 30-day window grouped by service and
//! reduces it to a total plus the top spenders. Billing failures never
//! propagate; they come back as a snapshot carrying `error`.

use super::round_to;
use crate::providers::{CloudProvider, CostMetric, CostQuery, Granularity};
use crate::types::{CostSnapshot, DatePeriod, ServiceCost};
use chrono::{Duration, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Trailing window length in days
const LOOKBACK_DAYS: i64 = 30;

/// Services kept in the breakdown
const TOP_SERVICES: usize = 20;

/// Billing dimension the breakdown is grouped by
const GROUP_BY_SERVICE: &str = "SERVICE";

/// Cost retriever over a cloud provider
pub struct CostRetriever<'a> {
    provider: &'a dyn CloudProvider,
}

impl<'a> CostRetriever<'a> {
    pub fn new(provider: &'a dyn CloudProvider) -> Self {
        Self { provider }
    }

    /// Window ending today (UTC)
    pub fn retrieve(&self) -> CostSnapshot {
        self.retrieve_for(Utc::now().date_naive())
    }

    /// Window `[today - 30, today]`
    pub fn retrieve_for(&self, today: NaiveDate) -> CostSnapshot {
        let period = trailing_period(today);
        let query = CostQuery {
            period,
            granularity: Granularity::Monthly,
            metric: CostMetric::UnblendedCost,
            group_by: GROUP_BY_SERVICE.to_string(),
        };

        let groups = match self.provider.cost_and_usage(&query) {
            Ok(groups) => groups,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Cost data unavailable");
                return CostSnapshot::unavailable(period, e.to_string());
            }
        };

        // A monthly query spanning two calendar months returns one row per
        // service per month.
        let mut per_service: HashMap<String, f64> = HashMap::new();
        let mut total = 0.0;
        for group in groups {
            total += group.amount;
            *per_service.entry(group.service).or_default() += group.amount;
        }

        let mut by_service: Vec<ServiceCost> = per_service
            .into_iter()
            .map(|(service, amount)| ServiceCost { service, amount })
            .collect();
        by_service.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.service.cmp(&b.service))
        });
        by_service.truncate(TOP_SERVICES);
        for entry in &mut by_service {
            entry.amount = round_to(entry.amount, 4);
        }

        debug!(total, services = by_service.len(), "Cost snapshot built");

        CostSnapshot {
            total: round_to(total, 2),
            by_service,
            period,
            error: None,
        }
    }
}

fn trailing_period(today: NaiveDate) -> DatePeriod {
    DatePeriod {
        start: today - Duration::days(LOOKBACK_DAYS),
        end: today,
    }
}
