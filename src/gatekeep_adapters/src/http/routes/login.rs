use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::{CookieJar, WithRejection};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use gatekeep_application::LoginUseCase;
use gatekeep_core::{ActivityLogStore, Password, UserStore, Username};

use crate::auth::{JwtConfig, generate_access_token, generate_refresh_cookie};
use crate::http::activity;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Serialize)]
pub struct LoginResponseBody {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub username: String,
    pub email: String,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, A>(
    State((user_store, activity_log, config)): State<(U, A, JwtConfig)>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    A: ActivityLogStore + 'static,
{
    let username = Username::try_from(request.username)?;
    let password = Password::try_from(request.password)?;

    let use_case = LoginUseCase::new(&user_store);
    let user = match use_case.execute(username.clone(), password).await {
        Ok(user) => user,
        Err(e) => {
            activity::record(&user_store, &activity_log, &username, "login_failed").await;
            return Err(e.into());
        }
    };

    activity::record(&user_store, &activity_log, &username, "login").await;

    let access_token = generate_access_token(&username, &config)
        .map_err(|e| AuthApiError::UnexpectedError(e.to_string()))?;
    let refresh_cookie = generate_refresh_cookie(&username, &config)
        .map_err(|e| AuthApiError::UnexpectedError(e.to_string()))?;

    let body = LoginResponseBody {
        access_token,
        username: username.as_str().to_owned(),
        email: user.email().as_ref().expose_secret().clone(),
    };

    Ok((jar.add(refresh_cookie), Json(body)))
}
