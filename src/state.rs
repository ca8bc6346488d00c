//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{CacheAside, CodeGenerator, ExpandEngine, ShortenEngine};
use crate::domain::repositories::MappingStore;
use crate::infrastructure::cache::CacheLayer;

/// Long-lived handles shared by all requests.
///
/// Both engines point at the same store and cache. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shorten_engine: Arc<ShortenEngine<dyn MappingStore>>,
    pub expand_engine: Arc<ExpandEngine<dyn MappingStore>>,
    pub store: Arc<dyn MappingStore>,
    pub cache: Arc<dyn CacheLayer>,
    /// Base for returned short URLs; `None` derives it from the request.
    pub public_base_url: Option<String>,
}

impl AppState {
    /// Wires the engines around a store and a cache.
    pub fn new(
        store: Arc<dyn MappingStore>,
        cache: Arc<dyn CacheLayer>,
        cache_ttl: Duration,
        code_max_attempts: u32,
        public_base_url: Option<String>,
    ) -> Self {
        let cache_aside = CacheAside::new(cache.clone(), cache_ttl);
        let generator = CodeGenerator::new(store.clone(), code_max_attempts);

        Self {
            shorten_engine: Arc::new(ShortenEngine::new(
                store.clone(),
                cache_aside.clone(),
                generator,
            )),
            expand_engine: Arc::new(ExpandEngine::new(store.clone(), cache_aside)),
            store,
            cache,
            public_base_url,
        }
    }
}
