//! Handler for the shorten endpoint.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{CandidateUrl, ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::{request_origin, short_url};
use crate::utils::url_input::{canonical_url, prepare_url};

/// Returns the short URL for a long URL, creating the mapping on first use.
///
/// # Endpoint
///
/// `POST /`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "example.com/some/long/path" }
/// ```
///
/// The URL is trimmed, stripped of line breaks, given an `https://` scheme if it
/// has none, validated and canonicalized before it reaches the engine. The
/// 2048 character limit is checked again on the canonical form, where non-ASCII
/// characters are percent-encoded. Submitting the same URL again returns the
/// same code.
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "https://sho.rt/K3x9Q1mZ",
///   "shortCode": "K3x9Q1mZ"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: URL missing, too long, malformed or not http(s)
/// - **500 Internal Server Error**: no free short code could be generated
/// - **503 Service Unavailable**: mapping store unreachable
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let candidate = CandidateUrl {
        url: prepare_url(&payload.original_url),
    };
    candidate.validate()?;

    let canonical = canonical_url(&candidate.url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    let base = match &state.public_base_url {
        Some(base) => base.clone(),
        None => request_origin(&headers)?,
    };

    let short_code = state.shorten_engine.shorten(&canonical).await?;

    Ok(Json(ShortenResponse {
        short_url: short_url(&base, &short_code),
        short_code,
    }))
}
