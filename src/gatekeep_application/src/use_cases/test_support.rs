//! Shared in-memory fakes for use-case unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gatekeep_core::{
    ActivityLogStore, ActivityLogStoreError, Email, EmailClient, Otp, Password, PendingSignup,
    ResetOtp, ResetOtpStore, ResetOtpStoreError, SignupCacheStore, SignupCacheStoreError, User,
    UserStore, UserStoreError, Username,
};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

pub fn username(value: &str) -> Username {
    Username::try_from(value.to_owned()).unwrap()
}

pub fn email(value: &str) -> Email {
    Email::try_from(Secret::from(value.to_owned())).unwrap()
}

pub fn password(value: &str) -> Password {
    Password::try_from(Secret::from(value.to_owned())).unwrap()
}

#[derive(Default, Clone)]
pub struct MockUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MockUserStore {
    pub async fn with_user(self, user: User) -> Self {
        self.users
            .write()
            .await
            .insert(user.username().as_str().to_owned(), user);
        self
    }

    pub async fn get(&self, username: &str) -> Option<User> {
        self.users.read().await.get(username).cloned()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.username().as_str()) {
            return Err(UserStoreError::UsernameTaken);
        }
        if users.values().any(|u| u.email() == user.email()) {
            return Err(UserStoreError::EmailTaken);
        }
        users.insert(user.username().as_str().to_owned(), user);
        Ok(())
    }

    async fn find_by_username(&self, username: &Username) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(username.as_str())
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email() == email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn authenticate_user(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        let user = users
            .get(username.as_str())
            .ok_or(UserStoreError::UserNotFound)?;
        if !user.password_matches(password) {
            return Err(UserStoreError::IncorrectPassword);
        }
        Ok(user.clone())
    }

    async fn set_new_password(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.email() == email)
            .ok_or(UserStoreError::UserNotFound)?;
        *user = User::parse(
            user.username().clone(),
            user.email().clone(),
            new_password,
            user.last_login(),
            user.last_activity(),
        );
        Ok(())
    }

    async fn record_login(&self, username: &Username) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(username.as_str())
            .ok_or(UserStoreError::UserNotFound)?;
        *user = User::parse(
            user.username().clone(),
            user.email().clone(),
            user.password().clone(),
            Some(Utc::now()),
            user.last_activity(),
        );
        Ok(())
    }

    async fn record_activity(&self, username: &Username) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(username.as_str())
            .ok_or(UserStoreError::UserNotFound)?;
        *user = User::parse(
            user.username().clone(),
            user.email().clone(),
            user.password().clone(),
            user.last_login(),
            Some(Utc::now()),
        );
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockSignupCache {
    entries: Arc<RwLock<HashMap<String, (String, Otp, DateTime<Utc>)>>>,
}

impl MockSignupCache {
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn stored_otp(&self, email: &Email) -> Option<Otp> {
        let key = email.as_ref().expose_secret().clone();
        self.entries.read().await.get(&key).map(|(_, otp, _)| *otp)
    }

    pub async fn expire_now(&self, email: &Email) {
        let key = email.as_ref().expose_secret().clone();
        self.entries.write().await.remove(&key);
    }
}

#[async_trait]
impl SignupCacheStore for MockSignupCache {
    async fn store_pending(
        &self,
        email: &Email,
        pending: &PendingSignup,
        otp: Otp,
        ttl: Duration,
    ) -> Result<(), SignupCacheStoreError> {
        let json = pending
            .to_json()
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;
        self.entries.write().await.insert(
            email.as_ref().expose_secret().clone(),
            (json, otp, Utc::now() + ttl),
        );
        Ok(())
    }

    async fn get_otp(&self, email: &Email) -> Result<Option<Otp>, SignupCacheStoreError> {
        let key = email.as_ref().expose_secret().clone();
        let entries = self.entries.read().await;
        Ok(entries
            .get(&key)
            .filter(|(_, _, expires)| *expires > Utc::now())
            .map(|(_, otp, _)| *otp))
    }

    async fn get_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingSignup>, SignupCacheStoreError> {
        let key = email.as_ref().expose_secret().clone();
        let entries = self.entries.read().await;
        match entries
            .get(&key)
            .filter(|(_, _, expires)| *expires > Utc::now())
        {
            Some((json, _, _)) => PendingSignup::from_json(json)
                .map(Some)
                .map_err(|e| SignupCacheStoreError::CacheError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn remove(&self, email: &Email) -> Result<(), SignupCacheStoreError> {
        let key = email.as_ref().expose_secret().clone();
        self.entries.write().await.remove(&key);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockResetOtpStore {
    records: Arc<RwLock<HashMap<String, ResetOtp>>>,
}

impl MockResetOtpStore {
    pub async fn get(&self, email: &Email) -> Option<ResetOtp> {
        let key = email.as_ref().expose_secret().clone();
        self.records.read().await.get(&key).cloned()
    }
}

#[async_trait]
impl ResetOtpStore for MockResetOtpStore {
    async fn replace(&self, email: &Email, record: ResetOtp) -> Result<(), ResetOtpStoreError> {
        let key = email.as_ref().expose_secret().clone();
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn find_by_otp(&self, email: &Email, otp: Otp) -> Result<ResetOtp, ResetOtpStoreError> {
        let key = email.as_ref().expose_secret().clone();
        self.records
            .read()
            .await
            .get(&key)
            .filter(|record| record.otp() == otp)
            .cloned()
            .ok_or(ResetOtpStoreError::RecordNotFound)
    }

    async fn find(&self, email: &Email) -> Result<ResetOtp, ResetOtpStoreError> {
        let key = email.as_ref().expose_secret().clone();
        self.records
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or(ResetOtpStoreError::RecordNotFound)
    }

    async fn mark_verified(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        let key = email.as_ref().expose_secret().clone();
        let mut records = self.records.write().await;
        let record = records.get_mut(&key).ok_or(ResetOtpStoreError::RecordNotFound)?;
        *record = ResetOtp::parse(record.otp(), record.expires_at(), true);
        Ok(())
    }

    async fn delete(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        let key = email.as_ref().expose_secret().clone();
        self.records.write().await.remove(&key);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecordingEmailClient {
    pub sent: Arc<RwLock<Vec<(String, String, String)>>>,
    pub fail: bool,
}

impl Default for RecordingEmailClient {
    fn default() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: false,
        }
    }
}

impl RecordingEmailClient {
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: true,
        }
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        html_body: &str,
    ) -> Result<(), String> {
        if self.fail {
            return Err("smtp unavailable".to_owned());
        }
        self.sent.write().await.push((
            recipient.as_ref().expose_secret().clone(),
            subject.to_owned(),
            html_body.to_owned(),
        ));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockActivityLog {
    pub entries: Arc<RwLock<Vec<(String, String)>>>,
}

#[async_trait]
impl ActivityLogStore for MockActivityLog {
    async fn record(
        &self,
        username: &Username,
        action: &str,
        _timestamp: DateTime<Utc>,
    ) -> Result<(), ActivityLogStoreError> {
        self.entries
            .write()
            .await
            .push((username.as_str().to_owned(), action.to_owned()));
        Ok(())
    }
}
