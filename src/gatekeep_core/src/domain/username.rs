use serde::{Deserialize, Serialize};

use super::user::UserError;

/// Unique, stable identifier a user logs in with. Also the JWT subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.len() > 64
            || trimmed.chars().any(|c| c.is_whitespace())
        {
            return Err(UserError::InvalidUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
