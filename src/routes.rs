//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /`        - Shorten a URL
//! - `GET  /health`  - Health check: store and cache
//! - `GET  /{code}`  - Expand a short code (redirect or JSON)
//!
//! # Middleware
//!
//! Outermost first:
//!
//! - **Path normalization** - Trailing slash handling
//! - **Request id** - `x-request-id` assigned and echoed
//! - **Tracing** - Structured request/response logging
//! - **Panic catching** - Handler panics become a JSON 500
//! - **CORS** - Permissive

use crate::api::handlers::{expand_handler, health_handler, shorten_handler};
use crate::api::middleware::{catch_panic, request_id, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::{Layer, ServiceBuilder};
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(expand_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id::set_layer())
                .layer(tracing::layer())
                .layer(request_id::propagate_layer())
                .layer(catch_panic::layer())
                .layer(CorsLayer::permissive()),
        )
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
