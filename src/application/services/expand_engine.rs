//! Expand path: cache, store, cache fill.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::cache_aside::CacheAside;
use super::shorten_engine::store_failure;
use crate::application::error::ResolveError;
use crate::domain::repositories::MappingStore;

/// Resolves a short code back to its original URL.
pub struct ExpandEngine<S: MappingStore + ?Sized> {
    store: Arc<S>,
    cache: CacheAside,
}

impl<S: MappingStore + ?Sized> ExpandEngine<S> {
    pub fn new(store: Arc<S>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    /// Returns the original URL for `short_code`, or `None` if it was never issued.
    ///
    /// A store hit rewrites both cache directions. Unknown codes are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::StoreUnavailable`] when the store fails.
    #[instrument(skip_all, fields(code = %short_code))]
    pub async fn expand(&self, short_code: &str) -> Result<Option<String>, ResolveError> {
        if let Some(url) = self.cache.url_for_code(short_code).await {
            return Ok(Some(url));
        }

        let Some(mapping) = self
            .store
            .find_by_short_code(short_code)
            .await
            .map_err(store_failure)?
        else {
            debug!("Short code not found");
            return Ok(None);
        };

        self.cache
            .fill(&mapping.original_url, &mapping.short_code)
            .await;
        Ok(Some(mapping.original_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::cache_aside::DEFAULT_CACHE_TTL;
    use crate::domain::entities::UrlMapping;
    use crate::domain::repositories::{MockMappingStore, StoreError};
    use crate::infrastructure::cache::{CacheError, MockCacheLayer};
    use chrono::Utc;

    fn engine(store: MockMappingStore, cache: MockCacheLayer) -> ExpandEngine<MockMappingStore> {
        ExpandEngine::new(
            Arc::new(store),
            CacheAside::new(Arc::new(cache), DEFAULT_CACHE_TTL),
        )
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let mut cache = MockCacheLayer::new();
        cache
            .expect_get()
            .withf(|key| key == "K3x9Q1mZ")
            .times(1)
            .returning(|_| Ok(Some("https://example.com/a".to_string())));
        cache.expect_set().never();

        let url = engine(MockMappingStore::new(), cache)
            .expand("K3x9Q1mZ")
            .await
            .unwrap();

        assert_eq!(url.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_store_hit_repairs_both_directions() {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_code()
            .times(1)
            .returning(|code| {
                Ok(Some(UrlMapping::new(
                    1,
                    "https://example.com/a".to_string(),
                    code.to_string(),
                    Utc::now(),
                )))
            });

        let mut cache = MockCacheLayer::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, value, _| key == "K3x9Q1mZ" && value == "https://example.com/a")
            .times(1)
            .returning(|_, _, _| Ok(()));
        cache
            .expect_set()
            .withf(|key, value, _| key == "url:https://example.com/a" && value == "K3x9Q1mZ")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let url = engine(store, cache).expand("K3x9Q1mZ").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_unknown_code_returns_none() {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let mut cache = MockCacheLayer::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache.expect_set().never();

        let url = engine(store, cache).expand("doesNotExist").await.unwrap();

        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn test_store_unavailable_propagates() {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("too many connections".to_string())));

        let mut cache = MockCacheLayer::new();
        cache.expect_get().returning(|_| Ok(None));

        let err = engine(store, cache).expand("K3x9Q1mZ").await.unwrap_err();

        assert!(matches!(err, ResolveError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_cache_outage_falls_back_to_store() {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_code()
            .times(1)
            .returning(|code| {
                Ok(Some(UrlMapping::new(
                    1,
                    "https://example.com/a".to_string(),
                    code.to_string(),
                    Utc::now(),
                )))
            });

        let mut cache = MockCacheLayer::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::ConnectionError("refused".to_string())));
        cache
            .expect_set()
            .returning(|_, _, _| Err(CacheError::ConnectionError("refused".to_string())));

        let url = engine(store, cache).expand("K3x9Q1mZ").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://example.com/a"));
    }
}
