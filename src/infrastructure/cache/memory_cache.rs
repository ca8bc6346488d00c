//! Process-local cache with per-entry expiry and a size bound.

use super::service::{CacheLayer, CacheResult};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default entry bound for `CACHE_BACKEND=memory`.
pub const DEFAULT_MAX_ENTRIES: u64 = 100_000;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct WriteTtl;

impl Expiry<String, Entry> for WriteTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache backed by Moka.
///
/// Entries expire after their own TTL and the least useful ones are evicted
/// once `max_entries` is reached. Intended for single-instance deployments
/// (`CACHE_BACKEND=memory`) and tests; entries are not shared between processes.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl MemoryCache {
    /// Creates a cache bounded to [`DEFAULT_MAX_ENTRIES`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(WriteTtl)
            .build();
        Self { entries }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries, after pending evictions and expirations are applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self.entries.get(key).await.map(|entry| entry.value);
        trace!(key, hit = value.is_some(), "Memory cache lookup");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries
            .insert(
                key.to_owned(),
                Entry {
                    value: value.to_owned(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
