//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{MappingStore, StoreError};

#[derive(Debug, sqlx::FromRow)]
struct UrlMappingRow {
    id: i64,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
}

impl From<UrlMappingRow> for UrlMapping {
    fn from(r: UrlMappingRow) -> Self {
        UrlMapping::new(r.id, r.original_url, r.short_code, r.created_at)
    }
}

/// PostgreSQL store for URL mappings.
///
/// Both uniqueness guarantees come from the `url_mappings_original_url_key` and
/// `url_mappings_short_code_key` constraints, so concurrent inserts from several
/// processes are arbitrated by the database.
pub struct PgMappingStore {
    pool: Arc<PgPool>,
}

impl PgMappingStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Total number of stored mappings.
    pub async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    /// Most recently created mappings, newest first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, StoreError> {
        let rows = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM url_mappings
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(UrlMapping::from).collect())
    }
}

/// Maps SQLx errors onto the store taxonomy.
///
/// Only unique violations become [`StoreError::Conflict`]; everything else is
/// reported as unavailability.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict {
            constraint: db_err.constraint().map(str::to_owned),
        };
    }

    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl MappingStore for PgMappingStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, StoreError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM url_mappings
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UrlMapping::from))
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM url_mappings
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UrlMapping::from))
    }

    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM url_mappings WHERE short_code = $1)")
            .bind(short_code)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            INSERT INTO url_mappings (original_url, short_code, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_code, created_at
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.short_code)
        .bind(new_mapping.created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
