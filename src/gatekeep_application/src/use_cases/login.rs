use gatekeep_core::{Password, User, UserStore, UserStoreError, Username};

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown username and wrong password collapse into one variant so the
    /// API cannot be used for username enumeration.
    #[error("Invalid username password")]
    InvalidCredentials,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Login use case - verifies credentials and stamps the login time
pub struct LoginUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> LoginUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        username: Username,
        password: Password,
    ) -> Result<User, LoginError> {
        let user = self
            .user_store
            .authenticate_user(&username, &password)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound | UserStoreError::IncorrectPassword => {
                    LoginError::InvalidCredentials
                }
                other => LoginError::UserStoreError(other),
            })?;

        self.user_store
            .record_login(&username)
            .await
            .map_err(LoginError::UserStoreError)?;

        Ok(user)
    }
}
