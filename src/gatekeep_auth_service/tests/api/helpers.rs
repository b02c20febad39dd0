use gatekeep_adapters::{
    auth::JwtConfig,
    config::OtpPolicy,
    email::MockEmailClient,
    persistence::{
        HashmapResetOtpStore, HashmapUserStore, InMemoryActivityLog, InMemorySignupCache,
    },
};
use gatekeep_auth_service::AuthService;
use regex::Regex;
use secrecy::Secret;
use serde_json::{Value, json};

/// A full service instance on an ephemeral port, backed by the in-memory
/// adapters, plus handles to the captured emails and activity entries.
pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub email_client: MockEmailClient,
    pub activity_log: InMemoryActivityLog,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let user_store = HashmapUserStore::new();
        let signup_cache = InMemorySignupCache::new();
        let reset_otp_store = HashmapResetOtpStore::new();
        let activity_log = InMemoryActivityLog::new();
        let email_client = MockEmailClient::new();

        let jwt_config = JwtConfig {
            jwt_secret: Secret::new("test-jwt-secret".to_owned()),
            access_ttl_seconds: 3600,
            refresh_ttl_seconds: 86_400,
            refresh_cookie_name: "refreshToken".to_owned(),
        };

        let service = AuthService::new(
            user_store,
            signup_cache,
            reset_otp_store,
            activity_log.clone(),
            email_client.clone(),
            jwt_config,
            OtpPolicy::default(),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let address = format!("http://{}", listener.local_addr().expect("listener address"));

        tokio::spawn(service.run_standalone(listener, None));

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("failed to build http client");

        Self {
            address,
            http_client,
            email_client,
            activity_log,
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post_json_with_bearer(
        &self,
        path: &str,
        body: &Value,
        token: &str,
    ) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> reqwest::Response {
        let mut request = self.http_client.get(format!("{}{}", self.address, path));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    /// The six-digit code in the most recent email sent to `recipient`.
    pub async fn last_otp_sent_to(&self, recipient: &str) -> String {
        let mail = self
            .email_client
            .last_sent_to(recipient)
            .await
            .expect("no email captured for recipient");
        let otp_pattern = Regex::new(r"\d{6}").expect("otp pattern");
        otp_pattern
            .find(&mail.html_body)
            .map(|m| m.as_str().to_owned())
            .expect("no otp in email body")
    }

    /// Run the whole signup flow so tests can start from a registered user.
    pub async fn register_and_verify(&self, username: &str, email: &str, password: &str) {
        let response = self
            .post_json(
                "/register",
                &json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let otp = self.last_otp_sent_to(email).await;
        let response = self
            .post_json("/verify-otp", &json!({ "email": email, "otp": otp }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/login",
            &json!({ "username": username, "password": password }),
        )
        .await
    }
}

/// A valid six-digit code guaranteed to differ from `otp`.
pub fn different_otp(otp: &str) -> String {
    if otp.starts_with('9') {
        format!("1{}", &otp[1..])
    } else {
        format!("9{}", &otp[1..])
    }
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("error body is json");
    body["error"].as_str().expect("error field").to_owned()
}
