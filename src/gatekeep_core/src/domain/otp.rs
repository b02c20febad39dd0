use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const OTP_MIN: u32 = 100_000;
const OTP_MAX: u32 = 999_999;

#[derive(Debug, Error, PartialEq)]
pub enum OtpError {
    #[error("OTP must be a six-digit number")]
    InvalidFormat,
}

/// Six-digit one-time password proving control of an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Otp(u32);

impl Otp {
    pub fn new() -> Self {
        Self(rand::rng().random_range(OTP_MIN..=OTP_MAX))
    }

    pub fn parse(value: &str) -> Result<Self, OtpError> {
        let code: u32 = value.trim().parse().map_err(|_| OtpError::InvalidFormat)?;
        if !(OTP_MIN..=OTP_MAX).contains(&code) {
            return Err(OtpError::InvalidFormat);
        }
        Ok(Self(code))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for Otp {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
