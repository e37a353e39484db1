use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::cookies::clear_auth_cookie;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// The protected resource: whoever the token names.
pub async fn get_me(
    Extension(current): Extension<AuthenticatedUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&current.user).into())
}

/// HTTP request body for updating the current user (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateMeRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let username = self.username.map(Username::new).transpose()?;

        Ok(UpdateUserCommand {
            username,
            password: self.password,
        })
    }
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateMeRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&current.user.id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Delete the current account and drop its cookie.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state.user_service.delete_user(&current.user.id).await?;

    Ok((jar.add(clear_auth_cookie(&state.cookie)), StatusCode::NO_CONTENT))
}
