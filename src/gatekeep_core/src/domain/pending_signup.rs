use secrecy::{ExposeSecret, Secret};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

use super::{email::Email, password::Password, user::UserError, username::Username};

/// Registration payload parked in the signup cache until the OTP is verified.
/// Exists only for the cache TTL window; once expired it is unrecoverable and
/// registration must restart.
#[derive(Debug, Clone)]
pub struct PendingSignup {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

impl PendingSignup {
    pub fn new(username: Username, email: Email, password: Password) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

// Secrets are serialized explicitly; the cache is the one place the raw
// payload is allowed to live.
impl Serialize for PendingSignup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PendingSignup", 3)?;
        state.serialize_field("username", self.username.as_str())?;
        state.serialize_field("email", self.email.as_ref().expose_secret())?;
        state.serialize_field("password", self.password.as_ref().expose_secret())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for PendingSignup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            username: String,
            email: String,
            password: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        let username = Username::try_from(raw.username).map_err(serde::de::Error::custom)?;
        let email = Email::try_from(Secret::from(raw.email)).map_err(serde::de::Error::custom)?;
        let password =
            Password::try_from(Secret::from(raw.password)).map_err(serde::de::Error::custom)?;
        Ok(Self {
            username,
            email,
            password,
        })
    }
}

impl PendingSignup {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(value: &str) -> Result<Self, PendingSignupError> {
        serde_json::from_str(value).map_err(PendingSignupError::Malformed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PendingSignupError {
    #[error("Malformed pending signup payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(#[from] UserError),
}
