//! Browser vs API client detection for the expand endpoint.

use axum::http::{HeaderMap, HeaderName, header};

const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");

/// Returns `true` when the request should receive a redirect.
///
/// A request is treated as an API client, and gets a JSON body instead, when any
/// of these hold (case-insensitive):
/// - `User-Agent` contains `postman`
/// - `Sec-Fetch-Mode` is `cors`
/// - `Referer` contains `swagger`
///
/// Everything else, including requests with none of these headers, is a browser.
pub fn is_browser_request(headers: &HeaderMap) -> bool {
    let header_lower = |name: &HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
    };

    if header_lower(&header::USER_AGENT).is_some_and(|ua| ua.contains("postman")) {
        return false;
    }

    if header_lower(&SEC_FETCH_MODE).is_some_and(|mode| mode == "cors") {
        return false;
    }

    if header_lower(&header::REFERER).is_some_and(|r| r.contains("swagger")) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_plain_browser() {
        let h = headers(&[
            ("user-agent", "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0"),
            ("sec-fetch-mode", "navigate"),
        ]);
        assert!(is_browser_request(&h));
    }

    #[test]
    fn test_no_headers_is_browser() {
        assert!(is_browser_request(&HeaderMap::new()));
    }

    #[test]
    fn test_postman_is_api_client() {
        let h = headers(&[("user-agent", "PostmanRuntime/7.39.0")]);
        assert!(!is_browser_request(&h));
    }

    #[test]
    fn test_cors_fetch_is_api_client() {
        let h = headers(&[("sec-fetch-mode", "CORS")]);
        assert!(!is_browser_request(&h));
    }

    #[test]
    fn test_swagger_referer_is_api_client() {
        let h = headers(&[("referer", "http://localhost:3000/Swagger/index.html")]);
        assert!(!is_browser_request(&h));
    }

    #[test]
    fn test_curl_is_browser() {
        let h = headers(&[("user-agent", "curl/8.5.0")]);
        assert!(is_browser_request(&h));
    }
}
