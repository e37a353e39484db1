use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::cookies::clear_auth_cookie;
use crate::inbound::http::router::AppState;

/// Drop the auth cookie. Tokens already handed out stay valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<LogoutResponseData>) {
    (
        jar.add(clear_auth_cookie(&state.cookie)),
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Successfully logged out".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
