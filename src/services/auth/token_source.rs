//! Where bearer tokens come from.
//!
//! The standard source is the `Authorization` header. The query-string source
//! is only used by `AuthEvents::on_extract_token` for the notifications carve-out.

use axum::http::{HeaderMap, Uri, header};

/// Query parameter carrying a token for streaming connections.
pub const ACCESS_TOKEN_QUERY_PARAM: &str = "access_token";

/// Path family allowed to send the token in the query string.
pub const NOTIFICATIONS_PATH: &str = "/notifications";

/// Standard extraction: `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and the value is trimmed;
/// an empty value counts as no token.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, rest) = value.split_at_checked("Bearer ".len())?;
    if !scheme.eq_ignore_ascii_case("Bearer ") {
        return None;
    }

    let token = rest.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// First value of a query parameter, URL-decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Segment-aware, ASCII case-insensitive prefix match.
///
/// `/notifications` matches `/notifications`, `/notifications/` and
/// `/Notifications/hub`, but not `/notificationsfeed`.
pub fn path_starts_with_segments(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }

    match path.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => {
            matches!(path.as_bytes().get(prefix.len()), None | Some(b'/'))
        }
        _ => false,
    }
}
