use axum::http::HeaderValue;
use chrono::Duration;
use config::{Config, ConfigError, Environment, File};
use gatekeep_core::DomainAllowList;
use secrecy::Secret;
use serde::Deserialize;

use crate::auth::JwtConfig;

use super::constants;

/// Everything the OTP flows are parameterized on.
#[derive(Clone)]
pub struct OtpPolicy {
    pub allow_list: DomainAllowList,
    pub signup_otp_ttl: Duration,
    pub reset_otp_ttl: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            allow_list: DomainAllowList::default(),
            signup_otp_ttl: Duration::minutes(2),
            reset_otp_ttl: Duration::minutes(2),
        }
    }
}

/// CORS origins the service answers to, preparsed into header values.
#[derive(Clone, Default)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn from_strings(origins: &[String]) -> Self {
        Self(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect(),
        )
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceSettings {
    pub app: AppSettings,
    pub jwt: JwtSettings,
    pub otp: OtpSettings,
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    pub email_client: EmailClientSettings,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub refresh_cookie_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpSettings {
    pub allowed_domains: Vec<String>,
    pub signup_ttl_minutes: i64,
    pub reset_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_millis: u64,
}

impl ServiceSettings {
    /// Layered load: built-in defaults, then an optional `gatekeep` config
    /// file, then `GATEKEEP__*` environment overrides, then the flat env
    /// vars the deployment already sets. `JWT_SECRET` and `DATABASE_URL`
    /// have no defaults; loading fails without them.
    pub fn load() -> Result<Self, ConfigError> {
        let allowed_origins = std::env::var(constants::env::ALLOWED_ORIGINS_ENV_VAR)
            .ok()
            .map(|v| v.split(',').map(str::to_owned).collect::<Vec<_>>());

        Config::builder()
            .set_default("app.address", constants::prod::APP_ADDRESS)?
            .set_default("jwt.access_ttl_seconds", 3600)?
            .set_default("jwt.refresh_ttl_seconds", 86_400)?
            .set_default("jwt.refresh_cookie_name", "refreshToken")?
            .set_default(
                "otp.allowed_domains",
                vec!["gmail.com".to_owned(), "jadeglobal.com".to_owned()],
            )?
            .set_default("otp.signup_ttl_minutes", 2)?
            .set_default("otp.reset_ttl_minutes", 2)?
            .set_default("redis.host_name", "127.0.0.1")?
            .set_default(
                "email_client.base_url",
                constants::prod::email_client::BASE_URL,
            )?
            .set_default("email_client.sender", constants::prod::email_client::SENDER)?
            .set_default("email_client.auth_token", "")?
            .set_default(
                "email_client.timeout_millis",
                constants::prod::email_client::TIMEOUT.as_millis() as u64,
            )?
            .set_default("allowed_origins", Vec::<String>::new())?
            .add_source(File::with_name("gatekeep").required(false))
            .add_source(Environment::with_prefix("GATEKEEP").separator("__"))
            .set_override_option(
                "jwt.secret",
                std::env::var(constants::env::JWT_SECRET_ENV_VAR).ok(),
            )?
            .set_override_option(
                "postgres.url",
                std::env::var(constants::env::DATABASE_URL_ENV_VAR).ok(),
            )?
            .set_override_option(
                "redis.host_name",
                std::env::var(constants::env::REDIS_HOST_NAME_ENV_VAR).ok(),
            )?
            .set_override_option(
                "email_client.auth_token",
                std::env::var(constants::env::POSTMARK_AUTH_TOKEN_ENV_VAR).ok(),
            )?
            .set_override_option("allowed_origins", allowed_origins)?
            .build()?
            .try_deserialize()
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            jwt_secret: self.jwt.secret.clone(),
            access_ttl_seconds: self.jwt.access_ttl_seconds,
            refresh_ttl_seconds: self.jwt.refresh_ttl_seconds,
            refresh_cookie_name: self.jwt.refresh_cookie_name.clone(),
        }
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            allow_list: DomainAllowList::new(self.otp.allowed_domains.clone()),
            signup_otp_ttl: Duration::minutes(self.otp.signup_ttl_minutes),
            reset_otp_ttl: Duration::minutes(self.otp.reset_ttl_minutes),
        }
    }

    pub fn allowed_origins(&self) -> AllowedOrigins {
        AllowedOrigins::from_strings(&self.allowed_origins)
    }

    pub fn email_client_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.email_client.timeout_millis)
    }
}
