use secrecy::{ExposeSecret, Secret};

use gatekeep_core::{
    DomainAllowList, Email, Password, ResetOtpStore, ResetOtpStoreError, UserError, UserStore,
    UserStoreError, Username,
};

/// Error types specific to the password change use case
#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Please provide an email from an allowed domain")]
    DomainNotAllowed,
    #[error("Please provide a valid email")]
    UserNotFound,
    #[error("OTP verification required")]
    OtpVerificationRequired,
    #[error("OTP not verified")]
    OtpNotVerified,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please provide a valid password")]
    InvalidPassword,
    #[error("OTP store error: {0}")]
    ResetOtpStoreError(ResetOtpStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Password change use case - the final step of the reset flow, gated on a
/// verified OTP record which is consumed on success
pub struct ChangePasswordUseCase<'a, U, R>
where
    U: UserStore,
    R: ResetOtpStore,
{
    user_store: &'a U,
    reset_otp_store: &'a R,
    allow_list: DomainAllowList,
}

impl<'a, U, R> ChangePasswordUseCase<'a, U, R>
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

    #[tracing::instrument(name = "ChangePasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        new_password: Secret<String>,
        confirm_password: Secret<String>,
    ) -> Result<Username, ChangePasswordError> {
        if !self.allow_list.is_allowed(&email) {
            return Err(ChangePasswordError::DomainNotAllowed);
        }

        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => ChangePasswordError::UserNotFound,
                other => ChangePasswordError::UserStoreError(other),
            })?;

        let record = self
            .reset_otp_store
            .find(&email)
            .await
            .map_err(|e| match e {
                ResetOtpStoreError::RecordNotFound => ChangePasswordError::OtpVerificationRequired,
                other => ChangePasswordError::ResetOtpStoreError(other),
            })?;

        if !record.verified() {
            return Err(ChangePasswordError::OtpNotVerified);
        }

        if new_password.expose_secret() != confirm_password.expose_secret() {
            return Err(ChangePasswordError::PasswordMismatch);
        }

        let password = Password::try_from(new_password).map_err(|e| match e {
            UserError::InvalidPassword => ChangePasswordError::InvalidPassword,
            _ => ChangePasswordError::InvalidPassword,
        })?;

        self.user_store
            .set_new_password(&email, password)
            .await
            .map_err(ChangePasswordError::UserStoreError)?;

        // Consume the record so the same verification cannot authorize a
        // second change.
        self.reset_otp_store
            .delete(&email)
            .await
            .map_err(ChangePasswordError::ResetOtpStoreError)?;

        Ok(user.username().clone())
    }
}
