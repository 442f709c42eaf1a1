//! Recommendation deduplication
//!
//! Several analyzers can flag the same resource for the same reason with
//! different estimates. One record survives per `type:resource_id` key: the
//! one with the strictly highest savings, first seen on ties. The losing
//! record is dropped whole; fields are never merged across duplicates.

use crate::types::Recommendation;
use std::collections::HashMap;

/// Collapse duplicates by `type:resource_id`.
///
/// Each surviving record sits at the position its key was first seen, so the
/// output is reproducible for a given input.
pub fn dedup_by_savings(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(recommendations.len());
    let mut best: Vec<Recommendation> = Vec::with_capacity(recommendations.len());

    for rec in recommendations {
        match slots.get(&rec.dedup_key()) {
            Some(&idx) => {
                if rec.savings > best[idx].savings {
                    best[idx] = rec;
                }
            }
            None => {
                slots.insert(rec.dedup_key(), best.len());
                best.push(rec);
            }
        }
    }

    best
}
