//! Route descriptor normalization.
//!
//! Turns raw route declarations (`"POST /:id"`, `"GET|PUT /"`, `"* /"`,
//! bare paths) into canonical `(Method, path)` pairs joined onto the
//! service basepath.

use http::Method;
use turnstile_core::RouteSpec;

/// The fixed ordered expansion of the `*` method wildcard.
pub const WILDCARD_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Collapse duplicate slashes, enforce a leading slash and strip the
/// trailing one unless the result is exactly `/`.
pub fn normalize_slashes(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    normalized.push_str(&segments.join("/"));
    normalized
}

/// Join a route path onto the service basepath and normalize the result.
pub fn join_routes(basepath: &str, path: &str) -> String {
    normalize_slashes(&format!("{basepath}/{path}"))
}

// Unknown tokens fall back to GET; the method set is permissive, not
// validating.
fn parse_method_token(token: &str) -> Method {
    match token.to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "HEAD" => Method::HEAD,
        "OPTIONS" => Method::OPTIONS,
        _ => Method::GET,
    }
}

/// Parse one route string into `(Method, path)` pairs.
///
/// The method part before the first space may be a single token, a
/// `|`-separated list, or `*` (expanding to [`WILDCARD_METHODS`]); a string
/// without a space is a bare path served over GET.
pub fn parse_route(raw: &str) -> Vec<(Method, String)> {
    let raw = raw.trim();
    let (method_part, path) = match raw.find(' ') {
        Some(position) => (&raw[..position], raw[position + 1..].trim_start()),
        None => ("", raw),
    };

    if method_part == "*" {
        return WILDCARD_METHODS
            .into_iter()
            .map(|method| (method, path.to_owned()))
            .collect();
    }

    if method_part.is_empty() {
        return vec![(Method::GET, path.to_owned())];
    }

    method_part
        .split('|')
        .map(|token| (parse_method_token(token.trim()), path.to_owned()))
        .collect()
}

/// Expand a comma-separated endpoint name into its aliases.
///
/// An entirely empty name yields one empty alias so that registration can
/// reject it; empty segments between commas are ignored.
pub fn expand_aliases(name: &str) -> Vec<String> {
    let aliases: Vec<String> = name
        .split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_owned)
        .collect();

    if aliases.is_empty() {
        return vec![String::new()];
    }
    aliases
}

/// Resolve an endpoint's route declarations against the service basepath.
pub fn resolve_routes(basepath: &str, spec: &RouteSpec) -> Vec<(Method, String)> {
    match spec {
        RouteSpec::Pattern(raw) => resolve_pattern(basepath, raw),
        RouteSpec::Patterns(list) => list
            .iter()
            .flat_map(|raw| resolve_pattern(basepath, raw))
            .collect(),
        RouteSpec::Pairs(pairs) => pairs
            .iter()
            .map(|(method, path)| (method.clone(), join_routes(basepath, path)))
            .collect(),
    }
}

fn resolve_pattern(basepath: &str, raw: &str) -> Vec<(Method, String)> {
    parse_route(raw)
        .into_iter()
        .map(|(method, path)| (method, join_routes(basepath, &path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_slashes() {
        assert_eq!(normalize_slashes("//users//7/"), "/users/7");
        assert_eq!(normalize_slashes("users"), "/users");
        assert_eq!(normalize_slashes("/"), "/");
        assert_eq!(normalize_slashes(""), "/");
    }

    #[test]
    fn test_join_routes_keeps_params() {
        assert_eq!(join_routes("/users", ":id"), "/users/:id");
        assert_eq!(join_routes("users/", "/:id/"), "/users/:id");
        assert_eq!(join_routes("/", "/"), "/");
    }

    #[test]
    fn test_parse_bare_path_defaults_to_get() {
        assert_eq!(parse_route("/things"), vec![(Method::GET, "/things".to_owned())]);
    }

    #[test]
    fn test_parse_method_list() {
        assert_eq!(
            parse_route("GET|PUT /"),
            vec![(Method::GET, "/".to_owned()), (Method::PUT, "/".to_owned())]
        );
    }

    #[test]
    fn test_parse_wildcard_method() {
        let routes = parse_route("* /");
        let methods: Vec<Method> = routes.into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, WILDCARD_METHODS.to_vec());
    }

    #[test]
    fn test_unknown_method_token_is_get() {
        assert_eq!(parse_route("FETCH /x"), vec![(Method::GET, "/x".to_owned())]);
    }

    #[test]
    fn test_expand_aliases() {
        assert_eq!(expand_aliases("get,fetch"), vec!["get", "fetch"]);
        assert_eq!(expand_aliases("get, fetch ,"), vec!["get", "fetch"]);
        assert_eq!(expand_aliases("  "), vec![String::new()]);
    }
}
