use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use gatekeep_application::RegisterUseCase;
use gatekeep_core::{Email, EmailClient, Password, PendingSignup, SignupCacheStore, UserStore, Username};

use crate::config::OtpPolicy;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<U, C, E>(
    State((user_store, signup_cache, email_client, policy)): State<(U, C, E, OtpPolicy)>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    C: SignupCacheStore + 'static,
    E: EmailClient + 'static,
{
    let username = Username::try_from(request.username)?;
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = RegisterUseCase::new(
        &user_store,
        &signup_cache,
        &email_client,
        policy.allow_list.clone(),
        policy.signup_otp_ttl,
    );

    use_case
        .execute(PendingSignup {
            username,
            email,
            password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        String::from("OTP sent to your email. Please verify."),
    ))
}
