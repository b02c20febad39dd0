use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use secrecy::Secret;
use serde::Deserialize;

use gatekeep_application::{ChangePasswordUseCase, RequestResetOtpUseCase, VerifyResetOtpUseCase};
use gatekeep_core::{ActivityLogStore, Email, EmailClient, Otp, ResetOtpStore, UserStore};

use crate::config::OtpPolicy;
use crate::http::activity;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct VerifyMailRequest {
    pub email: Secret<String>,
}

#[derive(Deserialize)]
pub struct VerifyResetOtpRequest {
    pub email: Secret<String>,
    pub otp: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub email: Secret<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Secret<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Secret<String>,
}

/// Step one of the reset flow: mail a fresh OTP to a known account.
#[tracing::instrument(name = "Password reset - verify mail", skip_all)]
pub async fn verify_mail<U, R, E, A>(
    State((user_store, reset_otp_store, email_client, activity_log, policy)): State<(
        U,
        R,
        E,
        A,
        OtpPolicy,
    )>,
    WithRejection(Json(request), _): WithRejection<Json<VerifyMailRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    R: ResetOtpStore + 'static,
    E: EmailClient + 'static,
    A: ActivityLogStore + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case = RequestResetOtpUseCase::new(
        &user_store,
        &reset_otp_store,
        &email_client,
        policy.allow_list.clone(),
        policy.reset_otp_ttl,
    );
    let username = use_case.execute(email).await?;

    activity::record(&user_store, &activity_log, &username, "password_reset_requested").await;

    Ok((StatusCode::OK, String::from("Email sent for verification")))
}

/// Step two: submit the mailed OTP.
#[tracing::instrument(name = "Password reset - verify OTP", skip_all)]
pub async fn verify_reset_otp<U, R, A>(
    State((user_store, reset_otp_store, activity_log, policy)): State<(U, R, A, OtpPolicy)>,
    WithRejection(Json(request), _): WithRejection<Json<VerifyResetOtpRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    R: ResetOtpStore + 'static,
    A: ActivityLogStore + 'static,
{
    let email = Email::try_from(request.email)?;
    let otp = Otp::parse(&request.otp)?;

    let use_case =
        VerifyResetOtpUseCase::new(&user_store, &reset_otp_store, policy.allow_list.clone());
    let username = use_case.execute(email, otp).await?;

    activity::record(
        &user_store,
        &activity_log,
        &username,
        "password_reset_otp_verified",
    )
    .await;

    Ok((StatusCode::OK, String::from("OTP verified")))
}

/// Step three: set the new password, consuming the verified record.
#[tracing::instrument(name = "Password reset - change password", skip_all)]
pub async fn change_password<U, R, A>(
    State((user_store, reset_otp_store, activity_log, policy)): State<(U, R, A, OtpPolicy)>,
    WithRejection(Json(request), _): WithRejection<Json<ChangePasswordRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    R: ResetOtpStore + 'static,
    A: ActivityLogStore + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case =
        ChangePasswordUseCase::new(&user_store, &reset_otp_store, policy.allow_list.clone());
    let username = use_case
        .execute(email, request.new_password, request.confirm_password)
        .await?;

    activity::record(&user_store, &activity_log, &username, "password_changed").await;

    Ok((StatusCode::OK, String::from("Password Updated")))
}
