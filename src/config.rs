//! Analysis configuration

use crate::services::cache::DEFAULT_TTL_SECS;
use crate::services::regions::DEFAULT_MAX_WORKERS;
use crate::types::{FinopsError, Result};
use std::time::Duration;

/// Default home region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound on region workers
const MAX_WORKERS_LIMIT: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub region: String,
    pub include_multi_region: bool,
    pub max_workers: usize,
    pub cache_ttl: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            include_multi_region: false,
            max_workers: DEFAULT_MAX_WORKERS,
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(FinopsError::Config("region must not be empty".into()));
        }
        if self.max_workers == 0 || self.max_workers > MAX_WORKERS_LIMIT {
            return Err(FinopsError::Config(format!(
                "max workers must be between 1 and {}, got {}",
                MAX_WORKERS_LIMIT, self.max_workers
            )));
        }
        Ok(())
    }
}
