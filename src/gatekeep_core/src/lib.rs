pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    allow_list::DomainAllowList,
    email::Email,
    otp::{Otp, OtpError},
    password::Password,
    pending_signup::PendingSignup,
    reset_otp::ResetOtp,
    user::{User, UserError},
    username::Username,
};

pub use ports::{
    repositories::{
        ActivityLogStore, ActivityLogStoreError, ResetOtpStore, ResetOtpStoreError,
        SignupCacheStore, SignupCacheStoreError, UserStore, UserStoreError,
    },
    services::EmailClient,
};
