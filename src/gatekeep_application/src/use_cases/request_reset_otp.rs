use chrono::Duration;
use gatekeep_core::{
    DomainAllowList, Email, EmailClient, Otp, ResetOtp, ResetOtpStore, ResetOtpStoreError,
    UserStore, UserStoreError, Username,
};

use super::mail;

/// Error types specific to the password-reset request use case
#[derive(Debug, thiserror::Error)]
pub enum RequestResetOtpError {
    #[error("Please provide an email from an allowed domain")]
    DomainNotAllowed,
    #[error("Please provide a valid email")]
    UserNotFound,
    #[error("Failed to send email: {0}")]
    EmailError(String),
    #[error("OTP store error: {0}")]
    ResetOtpStoreError(#[from] ResetOtpStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Password-reset request use case - replaces any prior OTP record for the
/// user and mails a fresh code
pub struct RequestResetOtpUseCase<'a, U, R, E>
where
    U: UserStore,
    R: ResetOtpStore,
    E: EmailClient,
{
    user_store: &'a U,
    reset_otp_store: &'a R,
    email_client: &'a E,
    allow_list: DomainAllowList,
    otp_ttl: Duration,
}

impl<'a, U, R, E> RequestResetOtpUseCase<'a, U, R, E>
where
    U: UserStore,
    R: ResetOtpStore,
    E: EmailClient,
{
    pub fn new(
        user_store: &'a U,
        reset_otp_store: &'a R,
        email_client: &'a E,
        allow_list: DomainAllowList,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            reset_otp_store,
            email_client,
            allow_list,
            otp_ttl,
        }
    }

    #[tracing::instrument(name = "RequestResetOtpUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<Username, RequestResetOtpError> {
        if !self.allow_list.is_allowed(&email) {
            return Err(RequestResetOtpError::DomainNotAllowed);
        }

        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => RequestResetOtpError::UserNotFound,
                other => RequestResetOtpError::UserStoreError(other),
            })?;

        let otp = Otp::new();
        // Replace is atomic per user: any previous record is dropped in the
        // same step, keeping at most one live OTP per principal.
        self.reset_otp_store
            .replace(&email, ResetOtp::new(otp, self.otp_ttl))
            .await?;

        let body = mail::reset_otp_body(user.username(), otp);
        self.email_client
            .send_email(&email, mail::RESET_OTP_SUBJECT, &body)
            .await
            .map_err(RequestResetOtpError::EmailError)?;

        Ok(user.username().clone())
    }
}
