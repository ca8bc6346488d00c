//! Handler for short code expansion.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use tracing::debug;

use crate::api::dto::expand::ExpandResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_type::is_browser_request;

/// Shape of anything that could be a short code.
static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").unwrap());

/// Resolves a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response
///
/// - Browsers get **302 Found** with `Location: <original url>`
/// - API clients (Postman, CORS fetches, Swagger UI) get **200 OK**:
///
/// ```json
/// { "originalUrl": "https://example.com/some/long/path" }
/// ```
///
/// See [`is_browser_request`] for how the two are told apart.
///
/// # Errors
///
/// - **404 Not Found**: malformed or unknown short code
/// - **503 Service Unavailable**: mapping store unreachable
pub async fn expand_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !SHORT_CODE_REGEX.is_match(&code) {
        return Err(short_url_not_found());
    }

    let Some(original_url) = state.expand_engine.expand(&code).await? else {
        return Err(short_url_not_found());
    };

    if is_browser_request(&headers) {
        debug!(code = %code, "Redirecting browser");
        Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
    } else {
        Ok(Json(ExpandResponse { original_url }).into_response())
    }
}

fn short_url_not_found() -> AppError {
    AppError::not_found("Short URL not found", json!({}))
}
