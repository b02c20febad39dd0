use gatekeep_core::{
    Email, EmailClient, Otp, SignupCacheStore, SignupCacheStoreError, User, UserStore,
    UserStoreError, Username,
};

use super::mail;

/// Error types specific to the OTP-verification half of registration
#[derive(Debug, thiserror::Error)]
pub enum VerifyRegistrationError {
    #[error("OTP expired or not requested.")]
    OtpExpired,
    #[error("Invalid OTP.")]
    InvalidOtp,
    /// The OTP key was present but the payload key was not. Both are written
    /// together with one TTL, so this indicates a cache fault.
    #[error("Pending registration data not found.")]
    MissingPendingData,
    #[error("Username already taken.")]
    UsernameTaken,
    #[error("Email already registered.")]
    EmailTaken,
    #[error("Cache error: {0}")]
    CacheError(#[from] SignupCacheStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// OTP-verification use case - promotes a cached signup to a durable user
pub struct VerifyRegistrationUseCase<'a, U, C, E>
where
    U: UserStore,
    C: SignupCacheStore,
    E: EmailClient,
{
    user_store: &'a U,
    signup_cache: &'a C,
    email_client: &'a E,
}

impl<'a, U, C, E> VerifyRegistrationUseCase<'a, U, C, E>
where
    U: UserStore,
    C: SignupCacheStore,
    E: EmailClient,
{
    pub fn new(user_store: &'a U, signup_cache: &'a C, email_client: &'a E) -> Self {
        Self {
            user_store,
            signup_cache,
            email_client,
        }
    }

    #[tracing::instrument(name = "VerifyRegistrationUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        submitted: Otp,
    ) -> Result<Username, VerifyRegistrationError> {
        let stored = self
            .signup_cache
            .get_otp(&email)
            .await?
            .ok_or(VerifyRegistrationError::OtpExpired)?;

        if stored != submitted {
            return Err(VerifyRegistrationError::InvalidOtp);
        }

        let pending = self
            .signup_cache
            .get_pending(&email)
            .await?
            .ok_or(VerifyRegistrationError::MissingPendingData)?;

        // Uniqueness was checked when the OTP was requested, but another
        // registration may have completed in between; the store's own
        // constraints are the final word.
        let username = pending.username.clone();
        let user = User::new(pending.username, pending.email, pending.password);
        self.user_store.add_user(user).await.map_err(|e| match e {
            UserStoreError::UsernameTaken => VerifyRegistrationError::UsernameTaken,
            UserStoreError::EmailTaken => VerifyRegistrationError::EmailTaken,
            other => VerifyRegistrationError::UserStoreError(other),
        })?;

        // The user is durable at this point; a failed welcome mail must not
        // fail the registration.
        if let Err(e) = self
            .email_client
            .send_email(&email, mail::WELCOME_SUBJECT, &mail::welcome_body(&username))
            .await
        {
            tracing::warn!(error = %e, "failed to send welcome email");
        }

        self.signup_cache.remove(&email).await?;

        Ok(username)
    }
}
