use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekeep_application::{
    ChangePasswordError, LoginError, RegisterError, RequestResetOtpError, VerifyRegistrationError,
    VerifyResetOtpError,
};
use gatekeep_core::{OtpError, UserError, UserStoreError};

use crate::auth::TokenAuthError;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Single error type at the HTTP boundary. Every variant is a response
/// status plus the exact message the client sees.
#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Please provide an email from an allowed domain")]
    DomainNotAllowed,

    #[error("Refresh token missing. Please log in.")]
    MissingRefreshToken,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    AuthenticationError(String),

    #[error("OTP verification required before changing password")]
    OtpVerificationRequired,

    #[error("OTP verification required before changing password")]
    OtpNotVerified,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    OtpExpired(String),

    #[error("An OTP was already sent to this email. Please verify it or wait before retrying.")]
    OtpAlreadyPending,

    #[error("{0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AuthApiError::InvalidInput(_)
            | AuthApiError::DomainNotAllowed
            | AuthApiError::MissingRefreshToken
            | AuthApiError::PasswordMismatch => StatusCode::BAD_REQUEST,

            AuthApiError::AuthenticationError(_) | AuthApiError::OtpVerificationRequired => {
                StatusCode::UNAUTHORIZED
            }

            AuthApiError::OtpNotVerified => StatusCode::FORBIDDEN,

            AuthApiError::NotFound(_) => StatusCode::NOT_FOUND,

            AuthApiError::Conflict(_) => StatusCode::CONFLICT,

            AuthApiError::OtpExpired(_) => StatusCode::GONE,

            AuthApiError::OtpAlreadyPending => StatusCode::TOO_MANY_REQUESTS,

            AuthApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

// Missing fields and unparseable bodies are client errors, not axum's
// default 422; funnel them through the same {"error"} shape as everything
// else.
impl From<JsonRejection> for AuthApiError {
    fn from(rejection: JsonRejection) -> Self {
        AuthApiError::InvalidInput(rejection.body_text())
    }
}

impl From<UserError> for AuthApiError {
    fn from(error: UserError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<OtpError> for AuthApiError {
    fn from(error: OtpError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UsernameTaken => AuthApiError::Conflict("Username already exists".to_owned()),
            UserStoreError::EmailTaken => AuthApiError::Conflict("Email already exists".to_owned()),
            UserStoreError::UserNotFound => AuthApiError::NotFound("User not found".to_owned()),
            UserStoreError::IncorrectPassword => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            UserStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<TokenAuthError> for AuthApiError {
    fn from(error: TokenAuthError) -> Self {
        match error {
            TokenAuthError::MissingToken => {
                AuthApiError::AuthenticationError("Missing authentication token".to_owned())
            }
            TokenAuthError::InvalidToken | TokenAuthError::TokenError(_) => {
                AuthApiError::AuthenticationError(
                    "Invalid or expired refresh token. Please log in again.".to_owned(),
                )
            }
            TokenAuthError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<RegisterError> for AuthApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::DomainNotAllowed => AuthApiError::DomainNotAllowed,
            RegisterError::UsernameTaken => {
                AuthApiError::Conflict("Username already exists".to_owned())
            }
            RegisterError::EmailTaken => AuthApiError::Conflict("Email already exists".to_owned()),
            RegisterError::OtpAlreadyPending => AuthApiError::OtpAlreadyPending,
            RegisterError::CacheError(e) => AuthApiError::UnexpectedError(e.to_string()),
            RegisterError::EmailError(e) => AuthApiError::UnexpectedError(e),
            RegisterError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyRegistrationError> for AuthApiError {
    fn from(error: VerifyRegistrationError) -> Self {
        match error {
            VerifyRegistrationError::OtpExpired => {
                AuthApiError::OtpExpired("OTP expired or not requested.".to_owned())
            }
            VerifyRegistrationError::InvalidOtp => {
                AuthApiError::AuthenticationError("Invalid OTP.".to_owned())
            }
            VerifyRegistrationError::MissingPendingData => {
                AuthApiError::UnexpectedError("Pending registration data not found.".to_owned())
            }
            VerifyRegistrationError::UsernameTaken => {
                AuthApiError::Conflict("Username already taken.".to_owned())
            }
            VerifyRegistrationError::EmailTaken => {
                AuthApiError::Conflict("Email already registered.".to_owned())
            }
            VerifyRegistrationError::CacheError(e) => AuthApiError::UnexpectedError(e.to_string()),
            VerifyRegistrationError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            // Unknown user and wrong password share one response on purpose.
            LoginError::InvalidCredentials => {
                AuthApiError::NotFound("Invalid username password".to_owned())
            }
            LoginError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<RequestResetOtpError> for AuthApiError {
    fn from(error: RequestResetOtpError) -> Self {
        match error {
            RequestResetOtpError::DomainNotAllowed => AuthApiError::DomainNotAllowed,
            RequestResetOtpError::UserNotFound => {
                AuthApiError::NotFound("Please provide a valid email".to_owned())
            }
            RequestResetOtpError::EmailError(e) => AuthApiError::UnexpectedError(e),
            RequestResetOtpError::ResetOtpStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            RequestResetOtpError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyResetOtpError> for AuthApiError {
    fn from(error: VerifyResetOtpError) -> Self {
        match error {
            VerifyResetOtpError::DomainNotAllowed => AuthApiError::DomainNotAllowed,
            VerifyResetOtpError::UserNotFound => {
                AuthApiError::NotFound("Please provide a valid email".to_owned())
            }
            VerifyResetOtpError::InvalidOtp => {
                AuthApiError::AuthenticationError("Invalid OTP".to_owned())
            }
            VerifyResetOtpError::OtpExpired => {
                AuthApiError::OtpExpired("OTP has expired".to_owned())
            }
            VerifyResetOtpError::ResetOtpStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            VerifyResetOtpError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ChangePasswordError> for AuthApiError {
    fn from(error: ChangePasswordError) -> Self {
        match error {
            ChangePasswordError::DomainNotAllowed => AuthApiError::DomainNotAllowed,
            ChangePasswordError::UserNotFound => {
                AuthApiError::NotFound("Please provide a valid email".to_owned())
            }
            ChangePasswordError::OtpVerificationRequired => AuthApiError::OtpVerificationRequired,
            ChangePasswordError::OtpNotVerified => AuthApiError::OtpNotVerified,
            ChangePasswordError::PasswordMismatch => AuthApiError::PasswordMismatch,
            ChangePasswordError::InvalidPassword => {
                AuthApiError::InvalidInput("Please provide a valid password".to_owned())
            }
            ChangePasswordError::ResetOtpStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            ChangePasswordError::UserStoreError(e) => e.into(),
        }
    }
}
