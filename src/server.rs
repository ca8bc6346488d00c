//! HTTP server initialization and runtime setup.
//!
//! Builds the mapping store and cache from configuration, wires the engines
//! and runs the Axum server until a shutdown signal arrives.

use crate::config::{CacheBackend, Config, StoreBackend};
use crate::domain::repositories::MappingStore;
use crate::infrastructure::cache::{CacheLayer, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryMappingStore, PgMappingStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (PostgreSQL with migrations, or in-memory)
/// - Cache (Redis, in-memory, or NullCache)
/// - Shorten and expand engines sharing both handles
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let cache = build_cache(&config).await?;

    let state = AppState::new(
        store,
        cache,
        config.cache_ttl(),
        config.code_max_attempts,
        config.public_base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Backoff for startup connections: about 100ms, doubling, capped at 5s, jittered.
///
/// `attempts` counts the first try, so `attempts - 1` delays are produced.
fn retry_strategy(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(attempts.saturating_sub(1))
}

/// Opens a PostgreSQL pool, retrying while the database comes up.
pub async fn connect_postgres(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let pool = Retry::spawn(retry_strategy(config.connect_retries), || {
        let options = options.clone();
        let database_url = database_url.to_string();
        async move {
            options.connect(&database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "PostgreSQL connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to PostgreSQL")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

async fn build_store(config: &Config) -> Result<Arc<dyn MappingStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, mappings are lost on restart");
            Ok(Arc::new(MemoryMappingStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORE_BACKEND=postgres")?;

            let pool = connect_postgres(config, database_url).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgMappingStore::new(Arc::new(pool))))
        }
    }
}

/// Builds the cache.
///
/// A configured Redis that cannot be reached at startup is kept as a lazily
/// connecting handle: requests fall through to the store and `/health` reports
/// the cache as degraded until Redis comes back.
///
/// # Errors
///
/// Returns an error only if the Redis URL is malformed.
async fn build_cache(config: &Config) -> Result<Arc<dyn CacheLayer>> {
    match (config.cache_backend, config.redis_url.as_deref()) {
        (CacheBackend::Redis, Some(redis_url)) => {
            let connected = Retry::spawn(retry_strategy(config.connect_retries), move || {
                RedisCache::connect(redis_url)
            })
            .await;

            match connected {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Ok(Arc::new(redis))
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to connect to Redis: {}. Serving from the store until it is reachable.",
                        e
                    );
                    let redis = RedisCache::lazy(redis_url).context("Invalid REDIS_URL")?;
                    Ok(Arc::new(redis))
                }
            }
        }
        (CacheBackend::Memory, _) => {
            tracing::info!(
                "Cache enabled (in-memory, max {} entries)",
                config.cache_max_entries
            );
            Ok(Arc::new(MemoryCache::with_capacity(config.cache_max_entries)))
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Ok(Arc::new(NullCache::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
