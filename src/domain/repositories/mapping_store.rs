//! Store trait for the durable URL mapping table.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use async_trait::async_trait;

/// Errors reported by a [`MappingStore`].
///
/// Constraint violations are kept apart from every other failure so callers can
/// tell a lost insert race from an unreachable store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the insert.
    #[error("unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    Conflict { constraint: Option<String> },

    /// The store is unreachable or failed for a reason other than a constraint.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: Some(constraint.into()),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Durable store for URL mappings, keyed by two independently unique attributes.
///
/// The store is the single source of truth for the original URL <-> short code
/// bijection. Reads are exact point lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryMappingStore`] - process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_mapping.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Finds the mapping for an exact original URL.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<UrlMapping>, StoreError>;

    /// Finds the mapping for an exact short code.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError>;

    /// Returns whether a short code is already taken.
    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, StoreError>;

    /// Inserts a new mapping.
    ///
    /// Atomic with respect to both uniqueness constraints.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the original URL or the short code
    /// already exists, including rows inserted concurrently by another writer.
    ///
    /// Returns [`StoreError::Unavailable`] on any other failure.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError>;

    /// Checks connectivity for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
