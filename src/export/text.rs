//! Plain-text summary for terminal output

use crate::types::AnalysisResult;
use std::fmt::Write;

/// Recommendations listed in the summary view
const TOP_N: usize = 10;

pub fn to_text(result: &AnalysisResult) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Account:   {}  ({})", result.account_id, result.region);
    let _ = writeln!(out, "Generated: {}", result.generated_at.to_rfc3339());
    match &result.costs.error {
        Some(error) => {
            let _ = writeln!(out, "Spend:     unavailable ({})", error);
        }
        None => {
            let _ = writeln!(
                out,
                "Spend:     ${:.2}  ({} to {})",
                result.costs.total, result.costs.period.start, result.costs.period.end
            );
        }
    }
    let _ = writeln!(
        out,
        "Savings:   ${:.2}/mo  ({:.1}% of spend)",
        summary.total_potential_savings, summary.savings_percentage
    );
    let _ = writeln!(
        out,
        "Findings:  {}  (high {}, medium {}, low {})",
        summary.recommendation_count,
        summary.priority_counts.high,
        summary.priority_counts.medium,
        summary.priority_counts.low
    );
    let _ = writeln!(out, "Sources:   {} active", summary.integrations_active);

    if let Some(multi) = &result.multi_region {
        let _ = writeln!(
            out,
            "Regions:   {} scanned, {} with resources",
            multi.summary.total_regions, multi.summary.regions_with_resources
        );
    }

    if !result.recommendations.is_empty() {
        out.push('\n');
        for rec in result.recommendations.iter().take(TOP_N) {
            let _ = writeln!(
                out,
                "{:>10.2}  {:<6}  {:<24}  {}",
                rec.savings,
                rec.priority.as_str(),
                rec.kind,
                rec.title
            );
        }
        let remaining = result.recommendations.len().saturating_sub(TOP_N);
        if remaining > 0 {
            let _ = writeln!(out, "... and {} more", remaining);
        }
    }

    out
}
