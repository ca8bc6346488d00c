//! Request and URL helpers for the HTTP boundary.
//!
//! - [`url_input`] - Cleaning and canonicalizing submitted URLs
//! - [`request_origin`] - Public origin of a request, short URL assembly
//! - [`request_type`] - Browser vs API client detection

pub mod request_origin;
pub mod request_type;
pub mod url_input;
