use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthenticatedUserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::cookies::auth_cookie;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::errors::UsernameError;

/// Register a new user and sign them in.
///
/// The response sets the auth cookie and also returns the token for
/// clients that prefer the `Authorization` header.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiSuccess<AuthenticatedUserData>), ApiError> {
    let command = body.try_into_command()?;

    let user = state
        .user_service
        .create_user(command)
        .await
        .map_err(|e| {
            if let UserError::UsernameAlreadyExists(ref username) = e {
                tracing::info!(username = %username, "Registration rejected, username taken");
            }
            ApiError::from(e)
        })?;

    let token = state.authenticator.issue_token(user.id).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
        ApiError::InternalServerError("Token generation failed".to_string())
    })?;

    Ok((
        jar.add(auth_cookie(&state.cookie, &token)),
        ApiSuccess::new(
            StatusCode::CREATED,
            AuthenticatedUserData {
                user: (&user).into(),
                token,
            },
        ),
    ))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseRegisterRequestError> {
        let username = Username::new(self.username)?;
        Ok(CreateUserCommand::new(username, self.password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
