//! Errors returned by the shorten and expand engines.

use crate::domain::repositories::StoreError;

/// Fatal outcomes of a shorten or expand request.
///
/// Cache failures and store conflicts never appear here: the engines absorb the
/// former and resolve the latter by re-reading the store. A missing short code is
/// not an error either; [`crate::application::services::ExpandEngine::expand`]
/// returns `Ok(None)` for it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// No collision-free short code was found within the retry bound.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// The store could not be reached or failed outside a constraint check.
    #[error("mapping store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for ResolveError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
            // Conflicts are handled where an insert happens; reaching this arm means
            // a store reported one on a read.
            other @ StoreError::Conflict { .. } => Self::StoreUnavailable(other.to_string()),
        }
    }
}
