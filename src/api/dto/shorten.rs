//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten. A missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,
}

/// A prepared URL, validated before normalization.
#[derive(Debug, Validate)]
pub struct CandidateUrl {
    #[validate(
        length(max = 2048, message = "URL must be at most 2048 characters"),
        url(message = "Invalid URL format")
    )]
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
}
