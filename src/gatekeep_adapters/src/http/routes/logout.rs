use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;

use crate::auth::{JwtConfig, create_removal_cookie};

use super::error::AuthApiError;

/// Stateless logout: the refresh cookie is cleared; the access token simply
/// runs out. No revocation list.
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout(
    State(config): State<JwtConfig>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError> {
    let jar = jar.add(create_removal_cookie(&config));

    Ok((StatusCode::OK, jar, String::from("Logged out successfully")))
}
