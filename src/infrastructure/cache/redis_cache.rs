//! Redis-backed cache implementation.

use super::service::{CacheError, CacheLayer, CacheResult};
use crate::config::mask_connection_string;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Upper bound on a single connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Minimum gap between two connection attempts while Redis is unreachable.
const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Redis cache implementation for fast mapping lookups.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Errors are returned to the caller, which treats them as cache misses.
///
/// A cache built with [`RedisCache::lazy`] connects on first use. Until the
/// connection succeeds every operation fails with [`CacheError::ConnectionError`]
/// and [`CacheLayer::health_check`] reports `false`. Once connected, the
/// `ConnectionManager` reconnects on its own.
pub struct RedisCache {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    last_attempt: Mutex<Option<Instant>>,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", mask_connection_string(redis_url));

        let cache = Self::lazy(redis_url)?;
        let mut conn = cache.open().await?;

        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        cache
            .manager
            .set(conn)
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        info!("Connected to Redis");
        Ok(cache)
    }

    /// Builds a cache without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL cannot be parsed.
    pub fn lazy(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            manager: OnceCell::new(),
            last_attempt: Mutex::new(None),
        })
    }

    async fn open(&self) -> CacheResult<ConnectionManager> {
        tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|_| CacheError::ConnectionError("Redis connection timed out".to_string()))?
            .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e)))
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        if let Some(conn) = self.manager.get() {
            return Ok(conn.clone());
        }

        {
            let mut last = self
                .last_attempt
                .lock()
                .map_err(|_| CacheError::ConnectionError("Redis state lock poisoned".to_string()))?;

            if let Some(at) = *last
                && at.elapsed() < RECONNECT_INTERVAL
            {
                return Err(CacheError::ConnectionError(
                    "Redis not connected".to_string(),
                ));
            }
            *last = Some(Instant::now());
        }

        let conn = self
            .manager
            .get_or_try_init(|| self.open())
            .await
            .inspect_err(|e| warn!(error = %e, "Redis still unreachable"))?;

        info!("Connected to Redis");
        Ok(conn.clone())
    }
}

#[async_trait]
impl CacheLayer for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;

        let value = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        match &value {
            Some(_) => debug!("Redis HIT: {}", key),
            None => debug!("Redis MISS: {}", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        // SET EX rejects a zero expiry.
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SET {}: {}", key, e)))?;

        debug!("Redis SET: {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self.connection().await {
            Ok(mut conn) => conn.ping::<()>().await.is_ok(),
            Err(_) => false,
        }
    }
}
