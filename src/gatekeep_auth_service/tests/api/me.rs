use gatekeep_adapters::{
    auth::{JwtConfig, generate_access_token},
    config::OtpPolicy,
    email::MockEmailClient,
    persistence::{HashmapResetOtpStore, InMemoryActivityLog, InMemorySignupCache},
};
use gatekeep_auth_service::AuthService;
use gatekeep_core::{Email, Password, User, UserStore, UserStoreError, Username};
use secrecy::Secret;
use serde_json::Value;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn me_without_a_token_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get("/me", None).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Missing authentication token");
}

#[tokio::test]
async fn me_with_a_garbage_token_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get("/me", Some("not-a-jwt")).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        error_message(response).await,
        "Invalid or expired access token. Please refresh."
    );
}

/// User store that answers every call with a backend failure.
#[derive(Clone)]
struct UnavailableUserStore;

#[async_trait::async_trait]
impl UserStore for UnavailableUserStore {
    async fn add_user(&self, _user: User) -> Result<(), UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn find_by_username(&self, _username: &Username) -> Result<User, UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn find_by_email(&self, _email: &Email) -> Result<User, UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn authenticate_user(
        &self,
        _username: &Username,
        _password: &Password,
    ) -> Result<User, UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn set_new_password(
        &self,
        _email: &Email,
        _new_password: Password,
    ) -> Result<(), UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn record_login(&self, _username: &Username) -> Result<(), UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }

    async fn record_activity(&self, _username: &Username) -> Result<(), UserStoreError> {
        Err(UserStoreError::UnexpectedError("connection refused".to_owned()))
    }
}

#[tokio::test]
async fn user_store_outage_is_a_500_not_a_401() {
    let jwt_config = JwtConfig {
        jwt_secret: Secret::new("test-jwt-secret".to_owned()),
        access_ttl_seconds: 3600,
        refresh_ttl_seconds: 86_400,
        refresh_cookie_name: "refreshToken".to_owned(),
    };

    let service = AuthService::new(
        UnavailableUserStore,
        InMemorySignupCache::new(),
        HashmapResetOtpStore::new(),
        InMemoryActivityLog::new(),
        MockEmailClient::new(),
        jwt_config.clone(),
        OtpPolicy::default(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(service.run_standalone(listener, None));

    let username = Username::try_from("alice".to_owned()).unwrap();
    let token = generate_access_token(&username, &jwt_config).unwrap();

    let response = reqwest::Client::new()
        .get(format!("{address}/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn me_returns_the_profile_of_the_token_subject() {
    let app = TestApp::spawn().await;
    app.register_and_verify("alice", "alice@gmail.com", "Password123!")
        .await;

    let response = app.login("alice", "Password123!").await;
    let body: Value = response.json().await.unwrap();
    let access_token = body["accessToken"].as_str().unwrap().to_owned();

    let response = app.get("/me", Some(&access_token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@gmail.com");
    assert!(body.get("lastLogin").is_some());
    assert!(body.get("lastActivity").is_some());
}
