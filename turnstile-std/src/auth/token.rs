//! Default bearer-token extraction.
//!
//! Checks the well-known sources in priority order: the `Authorization`
//! header, the access-token headers, cookies, body fields, then the query
//! string. The first hit wins. A scheme prefix such as `Bearer ` is
//! stripped; a bare token is used as-is.

use serde_json::Value;
use turnstile_core::RequestParts;

/// Header names consulted for a token, in priority order.
pub const TOKEN_HEADERS: [&str; 3] = ["authorization", "access-token", "access_token"];

/// Cookie, body and query keys consulted for a token, in priority order.
pub const TOKEN_FIELDS: [&str; 2] = ["authorization", "access_token"];

/// Extract a raw bearer token from the request, if one is present.
pub fn extract_bearer_token(parts: &RequestParts) -> Option<String> {
    let raw = from_headers(parts)
        .or_else(|| from_cookies(parts))
        .or_else(|| from_fields(&parts.body))
        .or_else(|| from_fields(&parts.query))?;
    Some(strip_scheme(&raw))
}

fn from_headers(parts: &RequestParts) -> Option<String> {
    TOKEN_HEADERS.iter().find_map(|name| {
        parts
            .headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    })
}

fn from_cookies(parts: &RequestParts) -> Option<String> {
    TOKEN_FIELDS
        .iter()
        .find_map(|name| parts.cookies.get(*name).cloned())
}

fn from_fields(fields: &serde_json::Map<String, Value>) -> Option<String> {
    TOKEN_FIELDS
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_str).map(str::to_owned))
}

fn strip_scheme(raw: &str) -> String {
    match raw.find(' ') {
        Some(position) => raw[position + 1..].to_owned(),
        None => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_authorization_header_wins() {
        let parts = RequestParts::new(Method::GET, "/")
            .header("Authorization", "Bearer abc")
            .cookie("access_token", "cookie-token");
        assert_eq!(extract_bearer_token(&parts).as_deref(), Some("abc"));
    }

    #[test]
    fn test_bare_token_kept_whole() {
        let parts = RequestParts::new(Method::GET, "/").header("Access-Token", "xyz");
        assert_eq!(extract_bearer_token(&parts).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_falls_back_to_query() {
        let parts = RequestParts::new(Method::GET, "/").query_param("access_token", "q-token");
        assert_eq!(extract_bearer_token(&parts).as_deref(), Some("q-token"));
    }

    #[test]
    fn test_no_token() {
        let parts = RequestParts::new(Method::GET, "/");
        assert_eq!(extract_bearer_token(&parts), None);
    }
}
