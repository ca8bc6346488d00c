//! Short code derivation with bounded collision retry.

use std::sync::Arc;

use base64::Engine as _;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::error::ResolveError;
use crate::domain::repositories::MappingStore;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 8;

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Random bytes mixed into each candidate.
const NONCE_LENGTH: usize = 16;

/// Derives one short code candidate from a URL and a nonce.
///
/// The URL and nonce are hashed with SHA-256, the digest is encoded as standard
/// base64, the characters `+`, `/` and `=` are removed and the first
/// [`CODE_LENGTH`] characters are kept.
///
/// Returns `None` when fewer than [`CODE_LENGTH`] characters survive the filter.
pub fn derive_candidate(url: &str, nonce: &[u8]) -> Option<String> {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(nonce);
    let digest = hasher.finalize();

    let candidate: String = base64::engine::general_purpose::STANDARD
        .encode(digest)
        .chars()
        .filter(|c| !matches!(c, '+' | '/' | '='))
        .take(CODE_LENGTH)
        .collect();

    (candidate.len() == CODE_LENGTH).then_some(candidate)
}

/// Generates collision-free short codes.
///
/// Each attempt uses a fresh random nonce, so the same URL yields a different
/// code on every call. Callers that need "same URL, same code" must look the URL
/// up before generating.
pub struct CodeGenerator<S: MappingStore + ?Sized> {
    store: Arc<S>,
    max_attempts: u32,
}

impl<S: MappingStore + ?Sized> CodeGenerator<S> {
    /// Creates a generator checking candidates against `store`.
    ///
    /// `max_attempts` is clamped to at least one.
    pub fn new(store: Arc<S>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns a code not currently present in the store.
    ///
    /// The store is asked at most `max_attempts` times. A code returned here can
    /// still be claimed by a concurrent writer before it is inserted; the insert
    /// reports that as a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::GenerationExhausted`] if every candidate collided.
    /// Returns [`ResolveError::StoreUnavailable`] if the existence check fails.
    pub async fn generate(&self, url: &str) -> Result<String, ResolveError> {
        for attempt in 1..=self.max_attempts {
            let nonce: [u8; NONCE_LENGTH] = rand::random();

            let Some(candidate) = derive_candidate(url, &nonce) else {
                debug!(attempt, "Candidate too short after filtering");
                continue;
            };

            if !self.store.exists_by_short_code(&candidate).await? {
                return Ok(candidate);
            }

            debug!(attempt, code = %candidate, "Short code collision");
        }

        Err(ResolveError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}
