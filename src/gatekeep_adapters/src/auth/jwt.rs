use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekeep_core::Username;

/// Signing configuration shared by token generation and validation. The
/// secret comes from settings and never changes for the process lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    pub jwt_secret: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub refresh_cookie_name: String,
}

impl JwtConfig {
    pub fn secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Error)]
pub enum TokenAuthError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Short-lived token sent in the Authorization header.
pub fn generate_access_token(
    username: &Username,
    config: &JwtConfig,
) -> Result<String, TokenAuthError> {
    generate_token(username, config.access_ttl_seconds, config.secret_bytes())
}

/// Long-lived token carried only by the refresh cookie.
pub fn generate_refresh_token(
    username: &Username,
    config: &JwtConfig,
) -> Result<String, TokenAuthError> {
    generate_token(username, config.refresh_ttl_seconds, config.secret_bytes())
}

fn generate_token(
    username: &Username,
    ttl_seconds: i64,
    secret: &[u8],
) -> Result<String, TokenAuthError> {
    let delta = chrono::Duration::try_seconds(ttl_seconds).ok_or(
        TokenAuthError::UnexpectedError("Failed to create token duration".to_string()),
    )?;

    let iat = Utc::now();
    let exp = iat
        .checked_add_signed(delta)
        .ok_or(TokenAuthError::UnexpectedError(
            "Duration out of range".to_string(),
        ))?
        .timestamp();

    let claims = Claims {
        sub: username.as_str().to_owned(),
        iat: iat.timestamp().max(0) as usize,
        exp: exp.max(0) as usize,
    };

    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(TokenAuthError::TokenError)
}

/// Pull the subject out of a token, checking signature and structure but not
/// expiry. Expiry is the caller's question, answered by [`is_token_valid`].
pub fn extract_subject(token: &str, config: &JwtConfig) -> Result<Username, TokenAuthError> {
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenAuthError::TokenError)?;

    Username::try_from(claims.sub).map_err(|_| TokenAuthError::InvalidToken)
}

/// Full validity check: signature verifies, the token is not past its expiry,
/// and the subject matches the expected principal. All failure modes collapse
/// to `false`.
pub fn is_token_valid(token: &str, expected: &Username, config: &JwtConfig) -> bool {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub == expected.as_str())
    .unwrap_or(false)
}

/// Validate a refresh token and return its subject. Expiry counts here; the
/// caller treats every failure the same.
pub fn verify_refresh_token(token: &str, config: &JwtConfig) -> Result<Username, TokenAuthError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenAuthError::TokenError)?;

    Username::try_from(claims.sub).map_err(|_| TokenAuthError::InvalidToken)
}

/// Cookie scoped to the refresh endpoint only, so the long-lived token never
/// rides along on other requests.
pub fn generate_refresh_cookie(
    username: &Username,
    config: &JwtConfig,
) -> Result<Cookie<'static>, TokenAuthError> {
    let token = generate_refresh_token(username, config)?;
    Ok(create_refresh_cookie(token, config))
}

pub fn create_refresh_cookie(token: String, config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((config.refresh_cookie_name.clone(), token))
        .path("/refresh")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.refresh_ttl_seconds))
        .build()
}

pub fn create_removal_cookie(config: &JwtConfig) -> Cookie<'static> {
    let mut cookie = create_refresh_cookie(String::new(), config);
    cookie.make_removal();
    cookie
}
