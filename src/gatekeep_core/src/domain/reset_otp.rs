use chrono::{DateTime, Duration, Utc};

use super::otp::Otp;

/// Password-reset OTP record. At most one exists per user at any time; the
/// store enforces that by replacing any prior record on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetOtp {
    otp: Otp,
    expires_at: DateTime<Utc>,
    verified: bool,
}

impl ResetOtp {
    pub fn new(otp: Otp, ttl: Duration) -> Self {
        Self {
            otp,
            expires_at: Utc::now() + ttl,
            verified: false,
        }
    }

    /// Rebuild a record from stored fields.
    pub fn parse(otp: Otp, expires_at: DateTime<Utc>, verified: bool) -> Self {
        Self {
            otp,
            expires_at,
            verified,
        }
    }

    pub fn otp(&self) -> Otp {
        self.otp
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    /// A record past its expiration time is never valid, verified or not.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
