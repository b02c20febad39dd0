use chrono::Duration;
use gatekeep_core::{
    DomainAllowList, EmailClient, Otp, PendingSignup, SignupCacheStore, SignupCacheStoreError,
    UserStore, UserStoreError,
};

use super::mail;

/// Error types specific to the registration-request use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Please provide an email from an allowed domain")]
    DomainNotAllowed,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
    #[error("An OTP was already sent to this email. Please verify it or wait before retrying.")]
    OtpAlreadyPending,
    #[error("Cache error: {0}")]
    CacheError(#[from] SignupCacheStoreError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Registration-request use case - validates the payload, parks it in the
/// signup cache and mails the OTP
pub struct RegisterUseCase<'a, U, C, E>
where
    U: UserStore,
    C: SignupCacheStore,
    E: EmailClient,
{
    user_store: &'a U,
    signup_cache: &'a C,
    email_client: &'a E,
    allow_list: DomainAllowList,
    otp_ttl: Duration,
}

impl<'a, U, C, E> RegisterUseCase<'a, U, C, E>
where
    U: UserStore,
    C: SignupCacheStore,
    E: EmailClient,
{
    pub fn new(
        user_store: &'a U,
        signup_cache: &'a C,
        email_client: &'a E,
        allow_list: DomainAllowList,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            signup_cache,
            email_client,
            allow_list,
            otp_ttl,
        }
    }

    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(&self, pending: PendingSignup) -> Result<(), RegisterError> {
        if !self.allow_list.is_allowed(&pending.email) {
            return Err(RegisterError::DomainNotAllowed);
        }

        match self.user_store.find_by_username(&pending.username).await {
            Ok(_) => return Err(RegisterError::UsernameTaken),
            Err(UserStoreError::UserNotFound) => {}
            Err(e) => return Err(RegisterError::UserStoreError(e)),
        }
        match self.user_store.find_by_email(&pending.email).await {
            Ok(_) => return Err(RegisterError::EmailTaken),
            Err(UserStoreError::UserNotFound) => {}
            Err(e) => return Err(RegisterError::UserStoreError(e)),
        }

        // Re-send spam guard: one pending OTP per email within the TTL window.
        if self.signup_cache.get_otp(&pending.email).await?.is_some() {
            return Err(RegisterError::OtpAlreadyPending);
        }

        let otp = Otp::new();
        self.signup_cache
            .store_pending(&pending.email, &pending, otp, self.otp_ttl)
            .await?;

        let body = mail::verification_body(&pending.username, otp, self.otp_ttl.num_minutes());
        self.email_client
            .send_email(&pending.email, mail::VERIFICATION_SUBJECT, &body)
            .await
            .map_err(RegisterError::EmailError)?;

        Ok(())
    }
}
