//! Locating a bearer token in request metadata.
//!
//! Absence is a normal outcome (an anonymous request), so these helpers return
//! `Option` rather than an error.

/// Default name of the cookie carrying the access token.
pub const DEFAULT_TOKEN_COOKIE: &str = "access_token";

const BEARER_SCHEME: &str = "Bearer";

/// Extract a token from an `Authorization` header value.
///
/// The value must be exactly two whitespace-separated parts: the literal
/// scheme `Bearer` and a token shaped like `<seg>.<seg>.<seg>`.
pub fn token_from_authorization(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };

    if scheme == BEARER_SCHEME && has_token_shape(token) {
        Some(token)
    } else {
        None
    }
}

/// Extract a token from the value of the token cookie.
///
/// Empty values and values not shaped like `<seg>.<seg>.<seg>` are treated as
/// absent.
pub fn token_from_cookie(cookie_value: &str) -> Option<&str> {
    let token = cookie_value.trim();
    if !token.is_empty() && has_token_shape(token) {
        Some(token)
    } else {
        None
    }
}

/// Prefer the cookie, fall back to the `Authorization` header.
///
/// A cookie that does not hold a token does not shadow the header.
pub fn token_from_request<'a>(
    cookie_value: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    cookie_value
        .and_then(token_from_cookie)
        .or_else(|| authorization.and_then(token_from_authorization))
}

fn has_token_shape(token: &str) -> bool {
    token.split('.').count() == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        assert_eq!(
            token_from_authorization("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_bearer_header_extra_whitespace() {
        assert_eq!(
            token_from_authorization("  Bearer   abc.def.ghi "),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_other_scheme() {
        assert_eq!(token_from_authorization("Basic xyz"), None);
        assert_eq!(token_from_authorization("bearer abc.def.ghi"), None);
    }

    #[test]
    fn test_bearer_without_token_shape() {
        assert_eq!(token_from_authorization("Bearer abcdef"), None);
        assert_eq!(token_from_authorization("Bearer abc.def"), None);
        assert_eq!(token_from_authorization("Bearer"), None);
        assert_eq!(token_from_authorization(""), None);
    }

    #[test]
    fn test_bearer_with_trailing_part() {
        assert_eq!(token_from_authorization("Bearer abc.def.ghi extra"), None);
    }

    #[test]
    fn test_cookie_value() {
        assert_eq!(token_from_cookie("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(token_from_cookie(""), None);
        assert_eq!(token_from_cookie("   "), None);
        assert_eq!(token_from_cookie("not-a-token"), None);
        assert_eq!(token_from_cookie("abc.def"), None);
    }

    #[test]
    fn test_malformed_cookie_falls_back_to_header() {
        assert_eq!(
            token_from_request(Some("not-a-token"), Some("Bearer a.b.c")),
            Some("a.b.c")
        );
        assert_eq!(token_from_request(Some("not-a-token"), None), None);
    }

    #[test]
    fn test_cookie_preferred_over_header() {
        assert_eq!(
            token_from_request(Some("from.cookie.token"), Some("Bearer from.header.token")),
            Some("from.cookie.token")
        );
        assert_eq!(
            token_from_request(Some(""), Some("Bearer from.header.token")),
            Some("from.header.token")
        );
        assert_eq!(
            token_from_request(None, Some("Bearer from.header.token")),
            Some("from.header.token")
        );
        assert_eq!(token_from_request(None, Some("Basic xyz")), None);
        assert_eq!(token_from_request(None, None), None);
    }
}
