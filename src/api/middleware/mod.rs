//! HTTP middleware for request processing and observability.
//!
//! - [`tracing`] - Per-request span with latency logging
//! - [`request_id`] - `x-request-id` correlation id
//! - [`catch_panic`] - Panic to 500 conversion

pub mod catch_panic;
pub mod request_id;
pub mod tracing;
