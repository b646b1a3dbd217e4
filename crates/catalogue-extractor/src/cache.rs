//! Response cache keyed by exact input text

use crate::client::InferenceOutcome;
use crate::config::CacheConfig;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache of inference outcomes
///
/// Keys are compared exactly. Only `Found` and `NotFound` outcomes are ever
/// stored; implementations ignore service failures passed to `put`.
pub trait ResponseCache: Send + Sync {
    /// Look up a previous outcome for the text
    fn get(&self, text: &str) -> Option<InferenceOutcome>;

    /// Remember the outcome for the text
    fn put(&self, text: &str, outcome: InferenceOutcome);
}

struct CacheEntry {
    outcome: InferenceOutcome,
    inserted_at: Instant,
}

/// In-memory cache bounded by entry age and entry count
///
/// Concurrent writers for the same text are last-writer-wins. When full,
/// expired entries are dropped first, then the oldest entry.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl TtlCache {
    /// Create a cache
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Create a cache from configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries)
    }

    /// Number of stored entries (including expired ones not yet purged)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl ResponseCache for TtlCache {
    fn get(&self, text: &str) -> Option<InferenceOutcome> {
        if let Some(entry) = self.entries.get(text) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.outcome.clone());
            }
        }

        let ttl = self.ttl;
        self.entries
            .remove_if(text, |_, entry| entry.inserted_at.elapsed() >= ttl);
        None
    }

    fn put(&self, text: &str, outcome: InferenceOutcome) {
        if !outcome.is_cacheable() || self.max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(text) && self.entries.len() >= self.max_entries {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
            debug!("Response cache full; {} entries after eviction", self.entries.len());
        }

        self.entries.insert(
            text.to_string(),
            CacheEntry {
                outcome,
                inserted_at: Instant::now(),
            },
        );
    }
}
