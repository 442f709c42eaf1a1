//! Resource and cost snapshot types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel for a service that answered but has nothing countable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Available,
}

/// A single resource counter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Count(i64),
    Amount(f64),
    Status(ResourceStatus),
}

impl ResourceValue {
    /// Numeric and greater than zero
    pub fn is_positive(&self) -> bool {
        match self {
            ResourceValue::Count(n) => *n > 0,
            ResourceValue::Amount(v) => *v > 0.0,
            ResourceValue::Status(_) => false,
        }
    }
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceValue::Count(n) => write!(f, "{}", n),
            ResourceValue::Amount(v) => write!(f, "{}", v),
            ResourceValue::Status(ResourceStatus::Available) => f.write_str("available"),
        }
    }
}

impl From<i64> for ResourceValue {
    fn from(n: i64) -> Self {
        ResourceValue::Count(n)
    }
}

impl From<usize> for ResourceValue {
    fn from(n: usize) -> Self {
        ResourceValue::Count(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ResourceValue {
    fn from(v: f64) -> Self {
        ResourceValue::Amount(v)
    }
}

/// Flat counter-name → value mapping. Keys starting with `_` are metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSnapshot(BTreeMap<String, ResourceValue>);

impl ResourceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ResourceValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.0.get(key)
    }

    /// Merge another snapshot in; incoming keys overwrite existing ones.
    pub fn merge(&mut self, other: ResourceSnapshot) {
        self.0.extend(other.0);
    }

    /// User-facing counters (metadata keys excluded)
    pub fn visible(&self) -> impl Iterator<Item = (&String, &ResourceValue)> {
        self.0.iter().filter(|(k, _)| !is_metadata_key(k))
    }

    /// Any user-facing numeric counter above zero
    pub fn has_resources(&self) -> bool {
        self.visible().any(|(_, v)| v.is_positive())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ResourceValue)> for ResourceSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, ResourceValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with('_')
}

/// Inclusive billing window, rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub amount: f64,
}

/// Spend over the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    pub total: f64,
    /// Top services, sorted descending by amount. Serialized as a
    /// `{service: amount}` object in that order.
    #[serde(with = "service_amounts")]
    pub by_service: Vec<ServiceCost>,
    pub period: DatePeriod,
    /// Present when billing data could not be retrieved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CostSnapshot {
    pub fn unavailable(period: DatePeriod, error: impl Into<String>) -> Self {
        Self {
            total: 0.0,
            by_service: Vec::new(),
            period,
            error: Some(error.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

/// `Vec<ServiceCost>` as an insertion-ordered JSON object
mod service_amounts {
    use super::ServiceCost;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(entries: &[ServiceCost], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in entries {
            map.serialize_entry(&entry.service, &entry.amount)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ServiceCost>, D::Error> {
        struct AmountsVisitor;

        impl<'de> Visitor<'de> for AmountsVisitor {
            type Value = Vec<ServiceCost>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of service name to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((service, amount)) = access.next_entry::<String, f64>()? {
                    entries.push(ServiceCost { service, amount });
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(AmountsVisitor)
    }
}
