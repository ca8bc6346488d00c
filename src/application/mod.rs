//! Application layer implementing the resolution core.
//!
//! The engines decide, for every request, whether the answer comes from the
//! cache or the store, and keep the two consistent. They consume the
//! [`crate::domain::repositories::MappingStore`] and
//! [`crate::infrastructure::cache::CacheLayer`] traits and know nothing about HTTP.
//!
//! # Available Services
//!
//! - [`services::ShortenEngine`] - Original URL to short code, creating mappings
//! - [`services::ExpandEngine`] - Short code to original URL
//! - [`services::CodeGenerator`] - Collision-checked short code generation
//! - [`services::CacheAside`] - Cache key scheme and fail-open access

pub mod error;
pub mod services;

pub use error::ResolveError;
