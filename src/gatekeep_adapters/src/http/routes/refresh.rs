use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use gatekeep_core::UserStore;

use crate::auth::{JwtConfig, generate_access_token, generate_refresh_cookie, verify_refresh_token};

use super::error::AuthApiError;

#[derive(Serialize)]
pub struct RefreshResponseBody {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Rotate the refresh token: a valid cookie buys a new access token and a
/// fresh cookie in one step.
#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<U>(
    State((user_store, config)): State<(U, JwtConfig)>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
{
    let token = jar
        .get(&config.refresh_cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(AuthApiError::MissingRefreshToken)?;

    let invalid = || {
        AuthApiError::AuthenticationError(
            "Invalid or expired refresh token. Please log in again.".to_owned(),
        )
    };

    let username = verify_refresh_token(&token, &config).map_err(|_| invalid())?;

    // The subject must still be a live user.
    user_store
        .find_by_username(&username)
        .await
        .map_err(|_| invalid())?;

    let access_token = generate_access_token(&username, &config)
        .map_err(|e| AuthApiError::UnexpectedError(e.to_string()))?;
    let refresh_cookie = generate_refresh_cookie(&username, &config)
        .map_err(|e| AuthApiError::UnexpectedError(e.to_string()))?;

    Ok((jar.add(refresh_cookie), Json(RefreshResponseBody { access_token })))
}
