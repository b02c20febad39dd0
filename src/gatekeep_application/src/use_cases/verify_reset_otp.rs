use gatekeep_core::{
    DomainAllowList, Email, Otp, ResetOtpStore, ResetOtpStoreError, UserStore, UserStoreError,
    Username,
};

/// Error types specific to the reset-OTP verification use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyResetOtpError {
    #[error("Please provide an email from an allowed domain")]
    DomainNotAllowed,
    #[error("Please provide a valid email")]
    UserNotFound,
    #[error("OTP is invalid")]
    InvalidOtp,
    #[error("OTP has expired")]
    OtpExpired,
    #[error("OTP store error: {0}")]
    ResetOtpStoreError(ResetOtpStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Reset-OTP verification use case - flips the record to verified so the
/// subsequent password change is allowed through
pub struct VerifyResetOtpUseCase<'a, U, R>
where
    U: UserStore,
    R: ResetOtpStore,
{
    user_store: &'a U,
    reset_otp_store: &'a R,
    allow_list: DomainAllowList,
}

impl<'a, U, R> VerifyResetOtpUseCase<'a, U, R>
where
    U: UserStore,
    R: ResetOtpStore,
{
    pub fn new(user_store: &'a U, reset_otp_store: &'a R, allow_list: DomainAllowList) -> Self {
        Self {
            user_store,
            reset_otp_store,
            allow_list,
        }
    }

    #[tracing::instrument(name = "VerifyResetOtpUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email, otp: Otp) -> Result<Username, VerifyResetOtpError> {
        if !self.allow_list.is_allowed(&email) {
            return Err(VerifyResetOtpError::DomainNotAllowed);
        }

        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => VerifyResetOtpError::UserNotFound,
                other => VerifyResetOtpError::UserStoreError(other),
            })?;

        // Joint lookup on (email, otp) so a wrong code and a missing record
        // are indistinguishable to the caller.
        let record = self
            .reset_otp_store
            .find_by_otp(&email, otp)
            .await
            .map_err(|e| match e {
                ResetOtpStoreError::RecordNotFound => VerifyResetOtpError::InvalidOtp,
                other => VerifyResetOtpError::ResetOtpStoreError(other),
            })?;

        if record.is_expired() {
            self.reset_otp_store
                .delete(&email)
                .await
                .map_err(VerifyResetOtpError::ResetOtpStoreError)?;
            return Err(VerifyResetOtpError::OtpExpired);
        }

        self.reset_otp_store
            .mark_verified(&email)
            .await
            .map_err(VerifyResetOtpError::ResetOtpStoreError)?;

        Ok(user.username().clone())
    }
}
