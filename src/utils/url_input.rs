//! Turning user-submitted text into the URL string the engines key on.
//!
//! The canonical string is the identity of a mapping: two spellings of one
//! address must canonicalize identically or they get different short codes.

use url::Url;

/// Longest URL accepted, measured on the canonical form.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum UrlInputError {
    #[error("Malformed URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("Unsupported scheme '{0}', only http and https are allowed")]
    UnsupportedScheme(String),

    #[error("URL is {len} characters once encoded, the limit is {}", MAX_URL_LENGTH)]
    TooLong { len: usize },
}

/// Cleans raw user input before validation.
///
/// Trims surrounding whitespace, removes embedded line breaks and prepends
/// `https://` when the input has no `http://` or `https://` scheme.
pub fn prepare_url(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();

    if has_http_scheme(&cleaned) {
        cleaned
    } else {
        format!("https://{}", cleaned)
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Canonical form of an http(s) URL.
///
/// Parsing lowercases the host, converts international hosts to punycode,
/// percent-encodes non-ASCII path and query characters and drops the default
/// port. The fragment is removed since it never reaches the target server.
/// Path and query keep their case.
///
/// The length limit applies after encoding, so a short input made of
/// multi-byte characters can still be rejected.
pub fn canonical_url(input: &str) -> Result<String, UrlInputError> {
    let mut url = Url::parse(input)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlInputError::UnsupportedScheme(url.scheme().to_string()));
    }

    url.set_fragment(None);

    let canonical = String::from(url);
    if canonical.len() > MAX_URL_LENGTH {
        return Err(UrlInputError::TooLong {
            len: canonical.len(),
        });
    }

    Ok(canonical)
}
