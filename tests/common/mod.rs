#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Barrier;
use url_resolver::application::services::cache_aside::DEFAULT_CACHE_TTL;
use url_resolver::application::services::code_generator::DEFAULT_MAX_ATTEMPTS;
use url_resolver::domain::entities::{NewUrlMapping, UrlMapping};
use url_resolver::domain::repositories::{MappingStore, StoreError};
use url_resolver::infrastructure::cache::{CacheError, CacheLayer, CacheResult, MemoryCache};
use url_resolver::infrastructure::persistence::MemoryMappingStore;
use url_resolver::state::AppState;

pub const HOST: &str = "sho.rt";

/// State wired to the in-memory store and cache, with handles to both.
pub fn memory_state(
    public_base_url: Option<&str>,
) -> (AppState, Arc<MemoryMappingStore>, Arc<MemoryCache>) {
    let store = Arc::new(MemoryMappingStore::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(
        store.clone(),
        cache.clone(),
        DEFAULT_CACHE_TTL,
        DEFAULT_MAX_ATTEMPTS,
        public_base_url.map(str::to_string),
    );

    (state, store, cache)
}

pub fn state_with(store: Arc<dyn MappingStore>, cache: Arc<dyn CacheLayer>) -> AppState {
    AppState::new(
        store,
        cache,
        DEFAULT_CACHE_TTL,
        DEFAULT_MAX_ATTEMPTS,
        Some("https://sho.rt".to_string()),
    )
}

/// Store whose every call fails as if the database were down.
pub struct DownStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl MappingStore for DownStore {
    async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlMapping>, StoreError> {
        Err(down())
    }

    async fn find_by_short_code(&self, _: &str) -> Result<Option<UrlMapping>, StoreError> {
        Err(down())
    }

    async fn exists_by_short_code(&self, _: &str) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn insert(&self, _: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

/// Cache whose backend is unreachable.
pub struct DownCache;

#[async_trait]
impl CacheLayer for DownCache {
    async fn get(&self, _: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set(&self, _: &str, _: &str, _: Duration) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Memory store that holds the first two URL lookups at a barrier.
///
/// Both lookups see an empty table before either caller inserts, so two
/// concurrent shortens of the same URL are forced into an insert race.
pub struct RacingStore {
    inner: MemoryMappingStore,
    barrier: Barrier,
    lookups: AtomicUsize,
}

impl RacingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryMappingStore::new(),
            barrier: Barrier::new(2),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.inner.len()
    }
}

#[async_trait]
impl MappingStore for RacingStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, StoreError> {
        let found = self.inner.find_by_original_url(original_url).await?;
        if self.lookups.fetch_add(1, Ordering::SeqCst) < 2 {
            self.barrier.wait().await;
        }
        Ok(found)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        self.inner.find_by_short_code(short_code).await
    }

    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, StoreError> {
        self.inner.exists_by_short_code(short_code).await
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        self.inner.insert(new_mapping).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}
