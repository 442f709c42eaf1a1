//! Summary KPIs over a finished recommendation list

use super::round_to;
use crate::types::{AnalysisSummary, CostSnapshot, Integrations, Priority, PriorityCounts, Recommendation};
use std::cmp::Ordering;

/// Sort descending by savings (stable; ties keep input order)
pub fn sort_by_savings(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.savings.partial_cmp(&a.savings).unwrap_or(Ordering::Equal));
}

/// Compute the summary for an already deduplicated and sorted list.
pub fn summarize(
    recommendations: &[Recommendation],
    costs: &CostSnapshot,
    integrations: &Integrations,
) -> AnalysisSummary {
    let total_potential_savings = round_to(recommendations.iter().map(|r| r.savings).sum(), 2);
    let total_cost = costs.total;

    let savings_percentage = if total_cost > 0.0 {
        round_to(total_potential_savings / total_cost * 100.0, 1)
    } else {
        0.0
    };

    let mut priority_counts = PriorityCounts::default();
    for rec in recommendations {
        match rec.priority {
            Priority::High => priority_counts.high += 1,
            Priority::Medium => priority_counts.medium += 1,
            Priority::Low => priority_counts.low += 1,
        }
    }

    AnalysisSummary {
        total_cost,
        total_potential_savings,
        savings_percentage,
        priority_counts,
        recommendation_count: recommendations.len(),
        integrations_active: integrations.active_count(),
        top_opportunity: recommendations.first().cloned(),
    }
}
