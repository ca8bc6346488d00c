//! Cache key scheme and fail-open cache access shared by both engines.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::infrastructure::cache::CacheLayer;

/// Default time-to-live for both cache directions (30 days).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

const URL_KEY_PREFIX: &str = "url:";

/// Key under which the original URL for `short_code` is cached.
pub fn code_key(short_code: &str) -> String {
    short_code.to_owned()
}

/// Key under which the short code for `original_url` is cached.
pub fn url_key(original_url: &str) -> String {
    format!("{URL_KEY_PREFIX}{original_url}")
}

/// Cache-aside wrapper around a [`CacheLayer`].
///
/// Every cache error is logged at `warn` and counted, then swallowed: reads
/// become misses and writes become no-ops.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheLayer>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn CacheLayer>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached short code for an original URL.
    pub async fn code_for_url(&self, original_url: &str) -> Option<String> {
        self.lookup(&url_key(original_url), "shorten").await
    }

    /// Cached original URL for a short code.
    pub async fn url_for_code(&self, short_code: &str) -> Option<String> {
        self.lookup(&code_key(short_code), "expand").await
    }

    /// Writes both directions of a mapping with the configured TTL.
    pub async fn fill(&self, original_url: &str, short_code: &str) {
        self.store(&code_key(short_code), original_url).await;
        self.store(&url_key(original_url), short_code).await;
    }

    async fn lookup(&self, key: &str, path: &'static str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                metrics::counter!("resolver_cache_hits_total", "path" => path).increment(1);
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                metrics::counter!("resolver_cache_misses_total", "path" => path).increment(1);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                metrics::counter!("resolver_cache_errors_total").increment(1);
                metrics::counter!("resolver_cache_misses_total", "path" => path).increment(1);
                None
            }
        }
    }

    async fn store(&self, key: &str, value: &str) {
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!(key, error = %e, "Cache write failed");
            metrics::counter!("resolver_cache_errors_total").increment(1);
        }
    }
}
