//! Shorten path: cache, store, generate and persist, cache fill.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::cache_aside::CacheAside;
use super::code_generator::CodeGenerator;
use crate::application::error::ResolveError;
use crate::domain::entities::NewUrlMapping;
use crate::domain::repositories::{MappingStore, StoreError};

/// Number of generate-and-insert rounds before a request gives up.
///
/// A round only repeats when the insert lost a short-code race, which needs two
/// writers to pick the same 8-character code at the same moment.
pub const PERSIST_ROUNDS: u32 = 3;

/// Resolves an original URL to its short code, creating the mapping if needed.
///
/// The engine holds no request state and can be shared across tasks. The only
/// serialization point is the store's uniqueness check on insert.
pub struct ShortenEngine<S: MappingStore + ?Sized> {
    store: Arc<S>,
    cache: CacheAside,
    generator: CodeGenerator<S>,
}

impl<S: MappingStore + ?Sized> ShortenEngine<S> {
    pub fn new(store: Arc<S>, cache: CacheAside, generator: CodeGenerator<S>) -> Self {
        Self {
            store,
            cache,
            generator,
        }
    }

    /// Returns the short code for `original_url`.
    ///
    /// `original_url` must already be normalized, scheme-qualified and valid.
    ///
    /// Lookup order is cache, then store, then code generation. Concurrent calls
    /// for the same new URL all return the code of whichever insert won.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::GenerationExhausted`] when no free code was found
    /// - [`ResolveError::StoreUnavailable`] when the store fails
    #[instrument(skip_all, fields(url = %original_url))]
    pub async fn shorten(&self, original_url: &str) -> Result<String, ResolveError> {
        if let Some(code) = self.cache.code_for_url(original_url).await {
            return Ok(code);
        }

        if let Some(code) = self.lookup_and_repair(original_url).await? {
            debug!(code = %code, "Mapping found in store");
            return Ok(code);
        }

        for round in 1..=PERSIST_ROUNDS {
            let code = self.generator.generate(original_url).await.inspect_err(|e| {
                error!(error = %e, "Short code generation failed");
            })?;

            match self
                .store
                .insert(NewUrlMapping::new(original_url, code))
                .await
            {
                Ok(mapping) => {
                    info!(code = %mapping.short_code, "Created new mapping");
                    metrics::counter!("resolver_mappings_created_total").increment(1);
                    self.cache
                        .fill(&mapping.original_url, &mapping.short_code)
                        .await;
                    return Ok(mapping.short_code);
                }
                Err(StoreError::Conflict { constraint }) => {
                    warn!(
                        round,
                        constraint = constraint.as_deref().unwrap_or("unknown"),
                        "Insert lost a race, re-reading store"
                    );
                    metrics::counter!("resolver_store_conflicts_total").increment(1);

                    if let Some(code) = self.lookup_and_repair(original_url).await? {
                        return Ok(code);
                    }
                }
                Err(e) => return Err(store_failure(e)),
            }
        }

        error!(rounds = PERSIST_ROUNDS, "Every insert collided on the short code");
        Err(ResolveError::GenerationExhausted {
            attempts: PERSIST_ROUNDS,
        })
    }

    /// Store lookup by URL; on a hit both cache directions are rewritten.
    async fn lookup_and_repair(&self, original_url: &str) -> Result<Option<String>, ResolveError> {
        let Some(mapping) = self
            .store
            .find_by_original_url(original_url)
            .await
            .map_err(store_failure)?
        else {
            return Ok(None);
        };

        self.cache
            .fill(&mapping.original_url, &mapping.short_code)
            .await;
        Ok(Some(mapping.short_code))
    }
}

pub(super) fn store_failure(e: StoreError) -> ResolveError {
    error!(error = %e, "Mapping store failure");
    e.into()
}
