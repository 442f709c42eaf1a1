//! Single-slot, time-boxed result cache
//!
//! Holds the most recent analysis for `ttl`. There is no region or account
//! dimension: whatever was computed last is what every caller gets until it
//! expires or is invalidated.
//!
//! The lock only guards the slot. Computation runs outside it, so two callers
//! that both find the slot stale will both compute and the last one to finish
//! wins. Runs are read-only, so the only cost is duplicate work.

use crate::types::{AnalysisResult, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time-to-live (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

struct CacheEntry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// TTL cache holding exactly one value
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry<T>>>,
}

/// The cache request handlers share
pub type AnalysisCache = TtlCache<AnalysisResult>;

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value, if any
    pub fn get_cached(&self) -> Option<Arc<T>> {
        let slot = self.lock();
        slot.as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Return the cached value, or compute, store and return a new one.
    /// A failed computation leaves the slot untouched.
    pub fn get_or_compute<F>(&self, compute: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(hit) = self.get_cached() {
            debug!("Result cache hit");
            return Ok(hit);
        }

        debug!("Result cache miss, computing");
        let value = Arc::new(compute()?);
        *self.lock() = Some(CacheEntry {
            value: Arc::clone(&value),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        *self.lock() = None;
        debug!("Result cache invalidated");
    }

    /// Age of the stored value, fresh or not
    pub fn age(&self) -> Option<Duration> {
        self.lock().as_ref().map(|entry| entry.stored_at.elapsed())
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry<T>>> {
        // The slot is always left in a valid state, so a poisoned lock is usable.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinopsError;
    use std::cell::Cell;

    #[test]
    fn test_default_ttl_is_five_minutes() {
        let cache: TtlCache<u32> = TtlCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_second_call_within_ttl_hits_cache() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let calls = Cell::new(0);

        let first = cache
            .get_or_compute(|| {
                calls.set(calls.get() + 1);
                Ok("report".to_string())
            })
            .unwrap();
        let second = cache
            .get_or_compute(|| {
                calls.set(calls.get() + 1);
                Ok("other".to_string())
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(*second, "report");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };

        cache.get_or_compute(compute).unwrap();
        cache.invalidate();
        assert!(cache.get_cached().is_none());
        let value = cache.get_or_compute(compute).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(*value, 2);
    }

    #[test]
    fn test_expired_entry_is_recomputed() {
        let cache = TtlCache::new(Duration::ZERO);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(())
        };

        cache.get_or_compute(compute).unwrap();
        cache.get_or_compute(compute).unwrap();

        assert_eq!(calls.get(), 2);
        assert!(cache.get_cached().is_none());
        assert!(cache.age().is_some());
    }

    #[test]
    fn test_failed_compute_stores_nothing() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(300));

        let err = cache.get_or_compute(|| Err(FinopsError::Config("boom".into())));
        assert!(err.is_err());
        assert!(cache.get_cached().is_none());
        assert!(cache.age().is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(300)));
        cache.get_or_compute(|| Ok(7u32)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || *cache.get_or_compute(|| Ok(0u32)).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 7);
        }
    }
}
