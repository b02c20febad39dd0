pub mod use_cases;

pub use use_cases::{
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    login::{LoginError, LoginUseCase},
    register::{RegisterError, RegisterUseCase},
    request_reset_otp::{RequestResetOtpError, RequestResetOtpUseCase},
    verify_registration::{VerifyRegistrationError, VerifyRegistrationUseCase},
    verify_reset_otp::{VerifyResetOtpError, VerifyResetOtpUseCase},
};
