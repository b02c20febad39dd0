use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use gatekeep_application::VerifyRegistrationUseCase;
use gatekeep_core::{ActivityLogStore, Email, EmailClient, Otp, SignupCacheStore, UserStore};

use crate::http::activity;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Secret<String>,
    pub otp: String,
}

#[tracing::instrument(name = "Verify registration OTP", skip_all)]
pub async fn verify_otp<U, C, E, A>(
    State((user_store, signup_cache, email_client, activity_log)): State<(U, C, E, A)>,
    WithRejection(Json(request), _): WithRejection<Json<VerifyOtpRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    C: SignupCacheStore + 'static,
    E: EmailClient + 'static,
    A: ActivityLogStore + 'static,
{
    let email = Email::try_from(request.email)?;
    let otp = Otp::parse(&request.otp)?;

    let use_case = VerifyRegistrationUseCase::new(&user_store, &signup_cache, &email_client);
    let username = use_case.execute(email, otp).await?;

    activity::record(&user_store, &activity_log, &username, "register").await;

    Ok((
        StatusCode::OK,
        String::from("Email verified and user registered successfully."),
    ))
}
