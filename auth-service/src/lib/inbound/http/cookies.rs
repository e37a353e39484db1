//! Auth cookie construction.
//!
//! The cookie holds the same RS256 token returned in login responses, so a
//! browser and an API client authenticate the same way.

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use time::Duration;

use crate::config::CookieConfig;

/// Build the httpOnly cookie carrying an access token.
pub fn auth_cookie(config: &CookieConfig, token: &str) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token.to_string()))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::milliseconds(config.max_age_ms))
        .build()
}

/// Build an expired cookie that removes the access token from the browser.
pub fn clear_auth_cookie(config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((config.name.clone(), String::new()))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie(&CookieConfig::default(), "a.b.c");

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "a.b.c");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(1)));
    }

    #[test]
    fn test_insecure_cookie_when_configured() {
        let config = CookieConfig {
            secure: false,
            ..CookieConfig::default()
        };

        assert_eq!(auth_cookie(&config, "a.b.c").secure(), Some(false));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_auth_cookie(&CookieConfig::default());

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
