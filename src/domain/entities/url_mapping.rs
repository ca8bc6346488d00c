//! UrlMapping entity: one row of the original URL <-> short code bijection.

use chrono::{DateTime, Utc};

/// A persisted mapping between an original URL and its short code.
///
/// Both `original_url` and `short_code` are globally unique in the store.
/// Mappings are never updated or deleted once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping. The store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl NewUrlMapping {
    /// Builds an insert payload stamped with the current time.
    pub fn new(original_url: impl Into<String>, short_code: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code: short_code.into(),
            created_at: Utc::now(),
        }
    }

    /// Attaches the store-assigned identifier.
    pub fn into_mapping(self, id: i64) -> UrlMapping {
        UrlMapping::new(id, self.original_url, self.short_code, self.created_at)
    }
}
