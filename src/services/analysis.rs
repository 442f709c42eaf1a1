//! Cached analysis service
//!
//! The object an outer layer (CLI, HTTP handlers) constructs once and shares
//! by reference: provider, optional all-services analyzer, configuration and
//! the single-slot result cache.

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::providers::{CloudProvider, ServiceAnalyzer};
use crate::services::cache::AnalysisCache;
use crate::services::Aggregator;
use crate::types::{AnalysisResult, Result};

pub struct AnalysisService {
    provider: Arc<dyn CloudProvider>,
    analyzer: Option<Arc<dyn ServiceAnalyzer>>,
    config: AnalysisConfig,
    cache: AnalysisCache,
}

impl AnalysisService {
    /// Validates `config` and sets up an empty cache with its TTL
    pub fn new(
        provider: Arc<dyn CloudProvider>,
        analyzer: Option<Arc<dyn ServiceAnalyzer>>,
        config: AnalysisConfig,
    ) -> Result<Self> {
        config.validate()?;
        let cache = AnalysisCache::new(config.cache_ttl);
        Ok(Self {
            provider,
            analyzer,
            config,
            cache,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Cached result, recomputed when stale
    pub fn get_cached(&self) -> Result<Arc<AnalysisResult>> {
        self.cache.get_or_compute(|| self.run())
    }

    /// Drop the cached result; the next `get_cached` recomputes
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Invalidate and recompute
    pub fn refresh(&self) -> Result<Arc<AnalysisResult>> {
        self.invalidate();
        self.get_cached()
    }

    /// Uncached run
    pub fn run(&self) -> Result<AnalysisResult> {
        Aggregator::new(self.provider.as_ref())
            .with_max_workers(self.config.max_workers)
            .run_analysis(
                &self.config.region,
                self.analyzer.as_deref(),
                self.config.include_multi_region,
            )
    }
}
