use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{email::Email, password::Password, username::Username};

#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid password")]
    InvalidPassword,
}

/// The durable identity record (principal) this service authenticates against.
///
/// Children (tasks, reminders, activity entries) reference the owner by
/// username; the user never holds collections of them.
#[derive(Debug, Clone)]
pub struct User {
    username: Username,
    email: Email,
    password: Password,
    last_login: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: Username, email: Email, password: Password) -> Self {
        Self {
            username,
            email,
            password,
            last_login: None,
            last_activity: None,
        }
    }

    /// Rebuild a user from stored fields.
    pub fn parse(
        username: Username,
        email: Email,
        password: Password,
        last_login: Option<DateTime<Utc>>,
        last_activity: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            username,
            email,
            password,
            last_login,
            last_activity,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    pub fn password_matches(&self, candidate: &Password) -> bool {
        &self.password == candidate
    }
}
