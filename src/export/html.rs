//! Self-contained HTML report

use crate::types::{AnalysisResult, RegionOutcome};
use std::fmt::Write;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:4px 10px;text-align:left}\
th{background:#f3f3f3}.HIGH{color:#b00020}.MEDIUM{color:#b26a00}.LOW{color:#2e7d32}\
.kpi{display:inline-block;margin-right:2rem}.err{color:#b00020}";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(result: &AnalysisResult) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    // fmt::Write into a String cannot fail
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>FinOps report {account}</title>\
         <style>{STYLE}</style></head><body>\n<h1>FinOps report</h1>\n\
         <p>Account {account} &middot; {region} &middot; generated {generated}</p>\n",
        account = escape(&result.account_id),
        region = escape(&result.region),
        generated = result.generated_at.to_rfc3339(),
    );

    let _ = writeln!(
        out,
        "<div><span class=\"kpi\">Spend (30d): ${:.2}</span><span class=\"kpi\">Potential savings: ${:.2}</span>\
         <span class=\"kpi\">Savings: {:.1}%</span><span class=\"kpi\">Sources active: {}</span></div>",
        summary.total_cost, summary.total_potential_savings, summary.savings_percentage, summary.integrations_active
    );

    if let Some(error) = &result.costs.error {
        let _ = writeln!(out, "<p class=\"err\">Cost data unavailable: {}</p>", escape(error));
    }

    out.push_str("<h2>Recommendations</h2>\n<table><tr><th>Priority</th><th>Type</th><th>Resource</th>\
                  <th>Title</th><th>Service</th><th>Savings / mo</th></tr>\n");
    for rec in &result.recommendations {
        let _ = writeln!(
            out,
            "<tr><td class=\"{p}\">{p}</td><td>{}</td><td>{}</td><td title=\"{}\">{}</td><td>{}</td><td>${:.2}</td></tr>",
            escape(&rec.kind),
            escape(&rec.resource_id),
            escape(&rec.description),
            escape(&rec.title),
            escape(&rec.service),
            rec.savings,
            p = rec.priority.as_str(),
        );
    }
    out.push_str("</table>\n");

    let _ = writeln!(
        out,
        "<h2>Spend by service ({} to {})</h2>\n<table><tr><th>Service</th><th>Cost</th></tr>",
        result.costs.period.start, result.costs.period.end
    );
    for entry in &result.costs.by_service {
        let _ = writeln!(out, "<tr><td>{}</td><td>${:.2}</td></tr>", escape(&entry.service), entry.amount);
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Resources</h2>\n<table><tr><th>Resource</th><th>Count</th></tr>\n");
    for (name, value) in result.resources.visible() {
        let _ = writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", escape(name), value);
    }
    out.push_str("</table>\n");

    if let Some(multi) = &result.multi_region {
        out.push_str("<h2>Regions</h2>\n<table><tr><th>Region</th><th>Status</th><th>Findings</th></tr>\n");
        for (region, outcome) in &multi.regions {
            let (status, detail) = match outcome {
                RegionOutcome::Success(report) => ("success", report.recommendations.len().to_string()),
                RegionOutcome::Error { error } => ("error", escape(error)),
            };
            let _ = writeln!(out, "<tr><td>{}</td><td>{}</td><td>{}</td></tr>", escape(region), status, detail);
        }
        out.push_str("</table>\n");
    }

    out.push_str("<h2>Data sources</h2>\n<ul>\n");
    for (source, ok) in result.integrations.iter() {
        let _ = writeln!(
            out,
            "<li>{}: {}</li>",
            escape(source),
            if *ok { "ok" } else { "unavailable" }
        );
    }
    out.push_str("</ul>\n</body></html>\n");

    out
}
