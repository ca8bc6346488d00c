//! Mapping store implementations.
//!
//! Concrete implementations of the [`crate::domain::repositories::MappingStore`]
//! trait.
//!
//! # Stores
//!
//! - [`PgMappingStore`] - PostgreSQL storage via SQLx
//! - [`MemoryMappingStore`] - process-local storage for development and tests

pub mod memory_mapping_store;
pub mod pg_mapping_store;

pub use memory_mapping_store::MemoryMappingStore;
pub use pg_mapping_store::PgMappingStore;
