use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use gatekeep_core::{Email, Password, User, UserStore, UserStoreError, Username};

/// In-memory user store for tests and local runs. Passwords are kept as
/// submitted; Argon2 hashing belongs to the durable store.
#[derive(Default, Clone)]
pub struct HashmapUserStore {
    users: Arc<RwLock<HashMap<Username, User>>>,
}

impl HashmapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        // Single write-lock section doubles as the uniqueness race guard.
        let mut users = self.users.write().await;
        if users.contains_key(user.username()) {
            return Err(UserStoreError::UsernameTaken);
        }
        if users.values().any(|u| u.email() == user.email()) {
            return Err(UserStoreError::EmailTaken);
        }
        users.insert(user.username().clone(), user);
        Ok(())
    }

    async fn find_by_username(&self, username: &Username) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(username)
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
        let user = users.get(username).ok_or(UserStoreError::UserNotFound)?;

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
        let user = users.get_mut(username).ok_or(UserStoreError::UserNotFound)?;

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
        let user = users.get_mut(username).ok_or(UserStoreError::UserNotFound)?;

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
