//! Services for recommendation aggregation and reporting

pub mod aggregator;
pub mod analysis;
pub mod cache;
pub mod cost;
pub mod dedup;
pub mod normalizer;
pub mod regions;
pub mod summary;

pub use aggregator::Aggregator;
pub use analysis::AnalysisService;
pub use cache::{AnalysisCache, TtlCache};
pub use cost::CostRetriever;
pub use dedup::dedup_by_savings;
pub use normalizer::{normalize_all, normalize_recommendation};
pub use regions::RegionFanout;
pub use summary::{sort_by_savings, summarize};

/// Round half away from zero to `places` decimals
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
