//! DTOs for the expand endpoint.

use serde::Serialize;

/// Body returned to API clients instead of a redirect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandResponse {
    pub original_url: String,
}
