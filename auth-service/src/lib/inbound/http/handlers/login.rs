use auth::AuthenticationError;
use auth::PasswordCredential;
use auth::PasswordHasher;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthenticatedUserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::cookies::auth_cookie;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

/// Well-formed credential no password derives to, so a full PBKDF2 run happens.
fn decoy_credential() -> PasswordCredential {
    PasswordCredential::new("0".repeat(128), "0".repeat(64))
}

/// Spend the same key-derivation work as a real check, so response timing
/// does not reveal whether a username exists.
fn reject_unknown_user(password: &str) -> ApiError {
    let _ = PasswordHasher::new().verify_credential(password, &decoy_credential());
    invalid_credentials()
}

/// Exchange username and password for a token.
///
/// Unknown users and wrong passwords produce the same response.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<AuthenticatedUserData>), ApiError> {
    let username =
        Username::new(body.username).map_err(|_| reject_unknown_user(&body.password))?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::warn!(username = %username, "Login failed, unknown user");
                reject_unknown_user(&body.password)
            }
            _ => ApiError::from(e),
        })?;

    let result = state
        .authenticator
        .authenticate(&body.password, &user.credential, user.id)
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::warn!(user_id = %user.id, "Login failed, wrong password");
                invalid_credentials()
            }
            AuthenticationError::PasswordError(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "Stored credential is malformed");
                invalid_credentials()
            }
            AuthenticationError::JwtError(err) => {
                tracing::error!(user_id = %user.id, error = %err, "Token issuance failed");
                ApiError::InternalServerError("Token generation failed".to_string())
            }
        })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar.add(auth_cookie(&state.cookie, &result.access_token)),
        ApiSuccess::new(
            StatusCode::OK,
            AuthenticatedUserData {
                user: (&user).into(),
                token: result.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}
