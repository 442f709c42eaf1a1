//! Report formatters. Pure string building, no I/O.

mod csv;
mod html;
mod text;

pub use csv::to_csv;
pub use html::to_html;
pub use text::to_text;

use crate::types::{AnalysisResult, FinopsError, Result};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
    /// Plain-text summary for the terminal
    Summary,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Summary => "txt",
        }
    }
}

pub fn to_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| FinopsError::Export(format!("JSON serialization failed: {}", e)))
}

pub fn render(result: &AnalysisResult, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(result),
        ExportFormat::Csv => Ok(to_csv(result)),
        ExportFormat::Html => Ok(to_html(result)),
        ExportFormat::Summary => Ok(to_text(result)),
    }
}

/// Shared fixture for the formatter tests
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::services::{sort_by_savings, summarize};
    use crate::types::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    pub fn sample_result() -> AnalysisResult {
        let mut recommendations = vec![
            Recommendation {
                kind: "EBS_ORPHAN".into(),
                resource_id: "vol-1".into(),
                title: "Unattached volume, 500 GB".into(),
                description: "Delete or snapshot \"vol-1\"".into(),
                priority: Priority::Medium,
                savings: 50.0,
                service: "EBS".into(),
            },
            Recommendation {
                kind: "EC2_RIGHTSIZE".into(),
                resource_id: "i-<big>".into(),
                title: "Downsize m5.4xlarge".into(),
                description: "CPU peak 4%".into(),
                priority: Priority::High,
                savings: 120.0,
                service: "Compute Optimizer".into(),
            },
        ];
        sort_by_savings(&mut recommendations);

        let costs = CostSnapshot {
            total: 1000.0,
            by_service: vec![
                ServiceCost {
                    service: "Amazon EC2".into(),
                    amount: 800.0,
                },
                ServiceCost {
                    service: "Amazon S3".into(),
                    amount: 200.0,
                },
            ],
            period: DatePeriod {
                start: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            },
            error: None,
        };

        let mut integrations = Integrations::new();
        integrations.set("cost_explorer", true);
        integrations.set("trusted_advisor", false);

        let mut resources = ResourceSnapshot::new();
        resources.insert("ec2_instances", 4i64);
        resources.insert("_services_analyzed_count", 412i64);

        let summary = summarize(&recommendations, &costs, &integrations);

        AnalysisResult {
            account_id: "123456789012".into(),
            region: "us-east-1".into(),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            costs,
            resources,
            recommendations,
            integrations,
            multi_region: None,
            summary,
        }
    }
}
