//! Public origin of a request, used to build short URLs.

use crate::AppError;
use axum::http::{HeaderMap, HeaderName, header};
use serde_json::json;

const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Builds `<scheme>://<host>` from request headers.
///
/// The host is the `Host` header as sent, port included. The scheme is the
/// first value of `X-Forwarded-Proto` when it is `http` or `https`, and `http`
/// otherwise.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing or empty
/// - The header value contains invalid UTF-8 or a path separator
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt:8080".parse().unwrap());
///
/// assert_eq!(request_origin(&headers).unwrap(), "http://sho.rt:8080");
/// ```
pub fn request_origin(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    if host.is_empty() || host.contains(['/', '\\', '@']) {
        return Err(AppError::bad_request("Invalid Host header", json!({})));
    }

    let scheme = headers
        .get(&X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".to_string());

    Ok(format!("{}://{}", scheme, host))
}

/// Joins a base URL and a short code.
pub fn short_url(base: &str, code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), code)
}
