//! Classification of request targets as auth endpoints.
//!
//! The classifier gates two independent decisions downstream: whether a
//! bearer header is attached to an outbound request, and whether a 401 is
//! allowed to enter the refresh path. Token-issuing endpoints get neither.

use url::Url;

/// Path prefixes of the token-issuing endpoints.
pub const AUTH_PATH_PREFIXES: &[&str] = &[
    "/oauth2/authorization",
    "/api/auth/exchange",
    "/api/auth/refresh",
    "/api/auth/logout",
];

/// Resolves a possibly-relative URL to its path component.
///
/// Absolute URLs are parsed; for anything unparseable the raw string with
/// query and fragment stripped is treated as the path, so classification
/// never fails on malformed input.
#[must_use]
pub fn path_of(target: &str) -> String {
    if let Ok(url) = Url::parse(target) {
        return url.path().to_string();
    }
    let raw = target
        .split_once(['?', '#'])
        .map_or(target, |(path, _)| path);
    raw.to_string()
}

/// Returns true if the target is a token-issuing (auth) endpoint.
#[must_use]
pub fn is_auth_endpoint(target: &str) -> bool {
    let path = path_of(target);
    AUTH_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}
