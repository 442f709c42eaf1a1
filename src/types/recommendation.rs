//! Recommendation types: the loose analyzer shape and the canonical record

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Recommendation priority (serialized uppercase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive parse; anything unrecognized maps to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "HIGH" => Priority::High,
            "LOW" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical recommendation. Only built through the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Estimated monthly USD savings, never negative
    pub savings: f64,
    pub service: String,
}

impl Recommendation {
    /// Composite key used by the deduplicator
    pub fn dedup_key(&self) -> String {
        format!("{}:{}", self.kind, self.resource_id)
    }
}

/// Analyzer output as emitted, before normalization.
///
/// Older analyzers use `resource`/`impact`/`source`, newer ones use
/// `resource_id`/`priority`/`service`. `savings` may arrive as a number or a
/// numeric string. Text fields accept strings, numbers and booleans; any other
/// JSON value reads as absent so one odd record never fails a whole document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawRecommendation {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Read a scalar as text: strings as-is, numbers and booleans stringified,
/// anything else (null, arrays, objects) as `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

impl From<&Recommendation> for RawRecommendation {
    fn from(rec: &Recommendation) -> Self {
        Self {
            kind: Some(rec.kind.clone()),
            resource_id: Some(rec.resource_id.clone()),
            title: Some(rec.title.clone()),
            description: Some(rec.description.clone()),
            priority: Some(rec.priority.as_str().to_string()),
            savings: serde_json::Number::from_f64(rec.savings).map(Value::Number),
            service: Some(rec.service.clone()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_lenient() {
        assert_eq!(Priority::parse_lenient("high"), Priority::High);
        assert_eq!(Priority::parse_lenient("Low"), Priority::Low);
        assert_eq!(Priority::parse_lenient("MEDIUM"), Priority::Medium);
        assert_eq!(Priority::parse_lenient("critical"), Priority::Medium);
        assert_eq!(Priority::parse_lenient(""), Priority::Medium);
    }

    #[test]
    fn test_priority_serializes_uppercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
    }

    #[test]
    fn test_recommendation_type_field_name() {
        let rec = Recommendation {
            kind: "EBS_ORPHAN".into(),
            resource_id: "vol-1".into(),
            title: "t".into(),
            description: "d".into(),
            priority: Priority::Low,
            savings: 4.0,
            service: "EBS".into(),
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["type"], "EBS_ORPHAN");
        assert_eq!(rec.dedup_key(), "EBS_ORPHAN:vol-1");
    }

    #[test]
    fn test_raw_accepts_legacy_fields() {
        let raw: RawRecommendation = serde_json::from_str(
            r#"{"type":"A","resource":"r1","impact":"high","savings":"12.5","source":"X"}"#,
        )
        .unwrap();
        assert_eq!(raw.kind.as_deref(), Some("A"));
        assert_eq!(raw.resource.as_deref(), Some("r1"));
        assert_eq!(raw.impact.as_deref(), Some("high"));
        assert!(raw.resource_id.is_none());
    }

    #[test]
    fn test_raw_stringifies_scalar_text_fields() {
        let raw: RawRecommendation = serde_json::from_str(
            r#"{"type":"SG_OPEN_PORT","resource_id":12345,"title":22,"source":false,"impact":null,"description":{"nested":1}}"#,
        )
        .unwrap();
        assert_eq!(raw.resource_id.as_deref(), Some("12345"));
        assert_eq!(raw.title.as_deref(), Some("22"));
        assert_eq!(raw.source.as_deref(), Some("false"));
        assert!(raw.impact.is_none());
        assert!(raw.description.is_none());
    }
}
