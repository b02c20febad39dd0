use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    otp::Otp,
    password::Password,
    pending_signup::PendingSignup,
    reset_otp::ResetOtp,
    user::User,
    username::Username,
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UsernameTaken, Self::UsernameTaken)
                | (Self::EmailTaken, Self::EmailTaken)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::IncorrectPassword, Self::IncorrectPassword)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Durable user store. `add_user` must enforce username and email uniqueness
/// atomically - verify-otp races rely on it.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError>;
    async fn find_by_username(&self, username: &Username) -> Result<User, UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn authenticate_user(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<User, UserStoreError>;
    async fn set_new_password(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn record_login(&self, username: &Username) -> Result<(), UserStoreError>;
    async fn record_activity(&self, username: &Username) -> Result<(), UserStoreError>;
}

// SignupCacheStore port trait and errors
#[derive(Debug, Error)]
pub enum SignupCacheStoreError {
    #[error("Cache error: {0}")]
    CacheError(String),
}

/// TTL key-value cache for pending registrations. Two keys per email
/// (`otp:<email>` and `user:<email>`), written together with one TTL.
#[async_trait]
pub trait SignupCacheStore: Send + Sync {
    async fn store_pending(
        &self,
        email: &Email,
        pending: &PendingSignup,
        otp: Otp,
        ttl: Duration,
    ) -> Result<(), SignupCacheStoreError>;
    async fn get_otp(&self, email: &Email) -> Result<Option<Otp>, SignupCacheStoreError>;
    async fn get_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingSignup>, SignupCacheStoreError>;
    /// Removes both keys. Removing absent keys is not an error.
    async fn remove(&self, email: &Email) -> Result<(), SignupCacheStoreError>;
}

// ResetOtpStore port trait and errors
#[derive(Debug, Error)]
pub enum ResetOtpStoreError {
    #[error("No OTP record for user")]
    RecordNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for ResetOtpStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::RecordNotFound, Self::RecordNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Password-reset OTP records, at most one per email. `replace` performs the
/// delete-prior-then-insert as one logically-atomic step; implementations
/// must serialize it per user against `mark_verified`.
#[async_trait]
pub trait ResetOtpStore: Send + Sync {
    async fn replace(&self, email: &Email, record: ResetOtp) -> Result<(), ResetOtpStoreError>;
    /// Joint lookup: a wrong code for the right user and a right code for the
    /// wrong user both miss, indistinguishably.
    async fn find_by_otp(&self, email: &Email, otp: Otp) -> Result<ResetOtp, ResetOtpStoreError>;
    async fn find(&self, email: &Email) -> Result<ResetOtp, ResetOtpStoreError>;
    async fn mark_verified(&self, email: &Email) -> Result<(), ResetOtpStoreError>;
    /// Removing an absent record is not an error.
    async fn delete(&self, email: &Email) -> Result<(), ResetOtpStoreError>;
}

// ActivityLogStore port trait and errors
#[derive(Debug, Error)]
pub enum ActivityLogStoreError {
    #[error("Activity log error: {0}")]
    StoreError(String),
}

/// Audit trail of user-visible actions. Writes are fire-and-forget from the
/// caller's perspective.
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    async fn record(
        &self,
        username: &Username,
        action: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ActivityLogStoreError>;
}
