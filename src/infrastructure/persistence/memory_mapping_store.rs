//! Process-local implementation of the mapping store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::{MappingStore, StoreError};

pub const ORIGINAL_URL_CONSTRAINT: &str = "url_mappings_original_url_key";
pub const SHORT_CODE_CONSTRAINT: &str = "url_mappings_short_code_key";

#[derive(Debug, Default)]
struct Tables {
    rows: Vec<UrlMapping>,
    by_original_url: HashMap<String, usize>,
    by_short_code: HashMap<String, usize>,
}

/// In-memory mapping store with two unique indexes.
///
/// Both indexes live behind a single lock so the uniqueness check and the write
/// in [`MappingStore::insert`] are one atomic step. The lock is never held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    tables: Mutex<Tables>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if a writer panicked while holding the lock.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .by_original_url
            .get(original_url)
            .map(|&idx| tables.rows[idx].clone()))
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .by_short_code
            .get(short_code)
            .map(|&idx| tables.rows[idx].clone()))
    }

    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.by_short_code.contains_key(short_code))
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, StoreError> {
        let mut tables = self.lock()?;

        if tables.by_original_url.contains_key(&new_mapping.original_url) {
            return Err(StoreError::conflict(ORIGINAL_URL_CONSTRAINT));
        }
        if tables.by_short_code.contains_key(&new_mapping.short_code) {
            return Err(StoreError::conflict(SHORT_CODE_CONSTRAINT));
        }

        let idx = tables.rows.len();
        let mapping = new_mapping.into_mapping(idx as i64 + 1);

        tables
            .by_original_url
            .insert(mapping.original_url.clone(), idx);
        tables.by_short_code.insert(mapping.short_code.clone(), idx);
        tables.rows.push(mapping.clone());

        Ok(mapping)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
