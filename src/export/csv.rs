//! CSV export: recommendations, cost breakdown and resource counts as three
//! blank-line separated tables.

use crate::types::AnalysisResult;
use std::fmt::Write;

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    let row: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

pub fn to_csv(result: &AnalysisResult) -> String {
    let mut out = String::new();

    push_row(
        &mut out,
        &["type", "resource_id", "title", "description", "priority", "savings", "service"],
    );
    for rec in &result.recommendations {
        let savings = format!("{:.2}", rec.savings);
        push_row(
            &mut out,
            &[
                rec.kind.as_str(),
                rec.resource_id.as_str(),
                rec.title.as_str(),
                rec.description.as_str(),
                rec.priority.as_str(),
                savings.as_str(),
                rec.service.as_str(),
            ],
        );
    }

    out.push('\n');
    push_row(&mut out, &["service", "cost"]);
    for entry in &result.costs.by_service {
        let amount = format!("{:.4}", entry.amount);
        push_row(&mut out, &[entry.service.as_str(), amount.as_str()]);
    }
    let total = format!("{:.2}", result.costs.total);
    push_row(&mut out, &["TOTAL", total.as_str()]);

    out.push('\n');
    push_row(&mut out, &["resource", "count"]);
    for (name, value) in result.resources.visible() {
        let _ = writeln!(out, "{},{}", escape(name), escape(&value.to_string()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::sample_result;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_recommendation_rows_in_sorted_order() {
        let csv = to_csv(&sample_result());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "type,resource_id,title,description,priority,savings,service");
        assert_eq!(
            lines[1],
            "EC2_RIGHTSIZE,i-<big>,Downsize m5.4xlarge,CPU peak 4%,HIGH,120.00,Compute Optimizer"
        );
        assert_eq!(
            lines[2],
            "EBS_ORPHAN,vol-1,\"Unattached volume, 500 GB\",\"Delete or snapshot \"\"vol-1\"\"\",MEDIUM,50.00,EBS"
        );
    }

    #[test]
    fn test_cost_and_resource_tables() {
        let csv = to_csv(&sample_result());

        assert!(csv.contains("service,cost\nAmazon EC2,800.0000\nAmazon S3,200.0000\nTOTAL,1000.00\n"));
        assert!(csv.contains("resource,count\nec2_instances,4\n"));
        assert!(!csv.contains("_services_analyzed_count"));
    }
}
