//! Core domain entities.
//!
//! - [`UrlMapping`] - A persisted original URL <-> short code mapping
//! - [`NewUrlMapping`] - Insert payload; the store assigns the identifier

pub mod url_mapping;

pub use url_mapping::{NewUrlMapping, UrlMapping};
