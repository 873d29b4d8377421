//! Memo table for the `Cached` matcher.
//!
//! # Thread Safety
//! The table sits behind a `Mutex`. The lock is only held for lookups and
//! inserts, never while the wrapped matcher runs, so a cached node may be
//! re-entered recursively and shared across threads. Two threads racing on
//! the same subject may both compute it; the results are equal.
//!
//! Entries are never evicted.

use log::trace;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::result::MatchResult;

/// Hit/miss counters of a [`MatchCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Maps an exact residual subject to the outcome previously computed for it.
/// Failures are stored as `None`.
#[derive(Debug, Default)]
pub struct MatchCache {
    entries: Mutex<HashMap<String, Option<MatchResult>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Option<MatchResult>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the stored outcome for `subject`, computing and storing it with
    /// `compute` when absent.
    pub fn get_or_compute<F>(&self, subject: &str, compute: F) -> Option<MatchResult>
    where
        F: FnOnce() -> Option<MatchResult>,
    {
        if let Some(found) = self.lock().get(subject) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("cache hit for subject of {} bytes", subject.len());
            return found.clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!("cache miss for subject of {} bytes", subject.len());
        let outcome = compute();
        self.lock()
            .entry(subject.to_string())
            .or_insert_with(|| outcome.clone());
        outcome
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_per_subject() {
        let cache = MatchCache::new();
        let mut calls = 0;
        let first = cache.get_or_compute("abc", || {
            calls += 1;
            Some(MatchResult::primitive("a"))
        });
        let second = cache.get_or_compute("abc", || {
            calls += 1;
            None
        });
        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn failures_are_cached() {
        let cache = MatchCache::new();
        assert_eq!(cache.get_or_compute("x", || None), None);
        assert_eq!(cache.get_or_compute("x", || Some(MatchResult::primitive("x"))), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let cache = MatchCache::new();
        cache.get_or_compute("x", || None);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
