use auth::AuthenticationState;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Extension;
use axum_extra::extract::CookieJar;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Extension type holding the user a request was authenticated as
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

fn unauthorized() -> Response {
    ApiError::Unauthorized("Unauthorized".to_string()).into_response()
}

/// Middleware that validates the request token and loads its subject.
///
/// The token is read from the auth cookie first, then from an
/// `Authorization: Bearer` header.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let cookie = jar.get(&state.cookie.name).map(|cookie| cookie.value());
    let token = auth::extract::token_from_request(cookie, authorization);

    let claims = match AuthenticationState::from_request_token(&state.verifier, token) {
        AuthenticationState::Authenticated(claims) => claims,
        AuthenticationState::NoToken => {
            tracing::debug!(uri = %req.uri(), "Request carries no token");
            return Err(unauthorized());
        }
        rejected => {
            tracing::warn!(
                uri = %req.uri(),
                state = rejected.as_str(),
                "Token rejected"
            );
            return Err(unauthorized());
        }
    };

    let user_id = UserId::from_string(claims.subject()).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        unauthorized()
    })?;

    let user = state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(user_id = %user_id, "Token subject no longer exists");
                unauthorized()
            }
            _ => ApiError::from(e).into_response(),
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

/// Middleware that admits only administrators. Must run after `authenticate`.
pub async fn require_admin(
    Extension(current): Extension<AuthenticatedUser>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    if !current.user.admin {
        tracing::warn!(user_id = %current.user.id, uri = %req.uri(), "Admin access denied");
        return Err(ApiError::Unauthorized(
            "You are not an admin. You are not authorized to access this resource.".to_string(),
        )
        .into_response());
    }

    Ok(next.run(req).await)
}
