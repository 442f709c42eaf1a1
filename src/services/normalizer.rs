//! Recommendation normalization service
//!
//! Maps the two field vocabularies analyzers emit onto the canonical
//! `Recommendation` record so nothing downstream has to care which one a
//! given analyzer used.

use crate::types::{Priority, RawRecommendation, Recommendation};
use serde_json::Value;

const DEFAULT_RESOURCE_ID: &str = "N/A";
const DEFAULT_SERVICE: &str = "Analysis";
const DEFAULT_KIND: &str = "UNKNOWN";

/// Normalize one raw recommendation. Total: every field has a default.
///
/// Field resolution:
/// - `resource_id` ← `resource_id`, `resource`, "N/A"
/// - `title` ← `title`, `description`, ""
/// - `description` ← `description`, `title`, ""
/// - `priority` ← `priority`, `impact`, "MEDIUM" (unknown values → MEDIUM)
/// - `service` ← `service`, `source`, "Analysis"
///
/// # Examples
/// ```
/// use finops_lens::services::normalizer::normalize_recommendation;
/// use finops_lens::types::{Priority, RawRecommendation};
///
/// let raw = RawRecommendation {
///     resource: Some("vol-1".into()),
///     impact: Some("high".into()),
///     ..Default::default()
/// };
/// let rec = normalize_recommendation(&raw);
/// assert_eq!(rec.resource_id, "vol-1");
/// assert_eq!(rec.priority, Priority::High);
/// ```
pub fn normalize_recommendation(raw: &RawRecommendation) -> Recommendation {
    let title = raw
        .title
        .as_deref()
        .or(raw.description.as_deref())
        .unwrap_or_default();
    let description = raw
        .description
        .as_deref()
        .or(raw.title.as_deref())
        .unwrap_or_default();

    let priority = raw
        .priority
        .as_deref()
        .or(raw.impact.as_deref())
        .map(Priority::parse_lenient)
        .unwrap_or_default();

    Recommendation {
        kind: raw.kind.as_deref().unwrap_or(DEFAULT_KIND).to_string(),
        resource_id: raw
            .resource_id
            .as_deref()
            .or(raw.resource.as_deref())
            .unwrap_or(DEFAULT_RESOURCE_ID)
            .to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        savings: coerce_savings(raw.savings.as_ref()),
        service: raw
            .service
            .as_deref()
            .or(raw.source.as_deref())
            .unwrap_or(DEFAULT_SERVICE)
            .to_string(),
    }
}

/// Normalize a batch, preserving order
pub fn normalize_all(raw: &[RawRecommendation]) -> Vec<Recommendation> {
    raw.iter().map(normalize_recommendation).collect()
}

/// Coerce a loosely typed savings value to a finite, non-negative float.
fn coerce_savings(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_start_matches('$').parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecommendation {
        serde_json::from_value(value).unwrap()
    }

    // ========== Legacy field set ==========

    #[test]
    fn test_legacy_fields_mapped() {
        let rec = normalize_recommendation(&raw(json!({
            "type": "A",
            "resource": "r1",
            "impact": "high",
            "savings": 10,
            "source": "X"
        })));

        assert_eq!(rec.kind, "A");
        assert_eq!(rec.resource_id, "r1");
        assert_eq!(rec.priority, Priority::High);
        assert!((rec.savings - 10.0).abs() < f64::EPSILON);
        assert_eq!(rec.service, "X");
    }

    #[test]
    fn test_canonical_fields_win_over_legacy() {
        let rec = normalize_recommendation(&raw(json!({
            "resource": "legacy",
            "resource_id": "canonical",
            "impact": "high",
            "priority": "low",
            "source": "old",
            "service": "new"
        })));

        assert_eq!(rec.resource_id, "canonical");
        assert_eq!(rec.priority, Priority::Low);
        assert_eq!(rec.service, "new");
    }

    // ========== Defaults ==========

    #[test]
    fn test_empty_input_fully_defaulted() {
        let rec = normalize_recommendation(&RawRecommendation::default());

        assert_eq!(rec.kind, "UNKNOWN");
        assert_eq!(rec.resource_id, "N/A");
        assert_eq!(rec.title, "");
        assert_eq!(rec.description, "");
        assert_eq!(rec.priority, Priority::Medium);
        assert!((rec.savings - 0.0).abs() < f64::EPSILON);
        assert_eq!(rec.service, "Analysis");
    }

    #[test]
    fn test_title_and_description_fill_each_other() {
        let only_desc = normalize_recommendation(&raw(json!({"description": "Delete it"})));
        assert_eq!(only_desc.title, "Delete it");
        assert_eq!(only_desc.description, "Delete it");

        let only_title = normalize_recommendation(&raw(json!({"title": "Idle NAT"})));
        assert_eq!(only_title.title, "Idle NAT");
        assert_eq!(only_title.description, "Idle NAT");
    }

    #[test]
    fn test_unknown_priority_falls_back_to_medium() {
        let rec = normalize_recommendation(&raw(json!({"priority": "critical"})));
        assert_eq!(rec.priority, Priority::Medium);
    }

    #[test]
    fn test_numeric_text_fields_stringified() {
        let rec = normalize_recommendation(&raw(json!({
            "type": "SG_OPEN_PORT",
            "resource_id": 123456789012u64,
            "title": 3389,
            "source": true,
            "savings": 5
        })));

        assert_eq!(rec.resource_id, "123456789012");
        assert_eq!(rec.title, "3389");
        assert_eq!(rec.description, "3389");
        assert_eq!(rec.service, "true");
        assert!((rec.savings - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_structured_text_fields_fall_back_to_defaults() {
        let rec = normalize_recommendation(&raw(json!({
            "type": ["A"],
            "resource": {"arn": "x"},
            "priority": 1
        })));

        assert_eq!(rec.kind, "UNKNOWN");
        assert_eq!(rec.resource_id, "N/A");
        assert_eq!(rec.priority, Priority::Medium);
    }

    // ========== Savings coercion ==========

    #[test]
    fn test_savings_from_numeric_string() {
        let rec = normalize_recommendation(&raw(json!({"savings": " 42.50 "})));
        assert!((rec.savings - 42.5).abs() < f64::EPSILON);

        let dollars = normalize_recommendation(&raw(json!({"savings": "$7"})));
        assert!((dollars.savings - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_savings_never_negative() {
        let negative = normalize_recommendation(&raw(json!({"savings": -5})));
        assert!((negative.savings - 0.0).abs() < f64::EPSILON);

        let garbage = normalize_recommendation(&raw(json!({"savings": "lots"})));
        assert!((garbage.savings - 0.0).abs() < f64::EPSILON);

        let wrong_type = normalize_recommendation(&raw(json!({"savings": [1, 2]})));
        assert!((wrong_type.savings - 0.0).abs() < f64::EPSILON);
    }

    // ========== Idempotence ==========

    #[test]
    fn test_normalizing_canonical_record_is_identity() {
        let first = normalize_recommendation(&raw(json!({
            "type": "EBS_ORPHAN",
            "resource": "vol-9",
            "description": "Unattached gp3 volume",
            "impact": "Low",
            "savings": 8.0,
            "source": "EBS"
        })));

        let second = normalize_recommendation(&RawRecommendation::from(&first));

        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let input = vec![
            raw(json!({"type": "B"})),
            raw(json!({"type": "A"})),
            raw(json!({"type": "C"})),
        ];
        let kinds: Vec<String> = normalize_all(&input).into_iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["B", "A", "C"]);
    }
}
