//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into engine calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request processing and observability middleware

pub mod dto;
pub mod handlers;
pub mod middleware;
