use std::sync::Arc;

use chrono::Duration;
use redis::{Commands, Connection};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use gatekeep_core::{Email, Otp, PendingSignup, SignupCacheStore, SignupCacheStoreError};

/// Redis-backed signup cache. The OTP and the pending payload are separate
/// keys written with the same TTL; Redis handles eviction.
#[derive(Clone)]
pub struct RedisSignupCache {
    conn: Arc<Mutex<Connection>>,
}

impl RedisSignupCache {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl SignupCacheStore for RedisSignupCache {
    #[tracing::instrument(name = "Caching pending signup in Redis", skip_all)]
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
        let ttl_seconds = ttl.num_seconds().max(1) as u64;

        let mut conn = self.conn.lock().await;
        let _: () = conn
            .set_ex(otp_key(email), otp.to_string(), ttl_seconds)
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;
        let _: () = conn
            .set_ex(pending_key(email), json, ttl_seconds)
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;
        Ok(())
    }

    async fn get_otp(&self, email: &Email) -> Result<Option<Otp>, SignupCacheStoreError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = conn
            .get(otp_key(email))
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;

        match value {
            Some(v) => Otp::parse(&v)
                .map(Some)
                .map_err(|e| SignupCacheStoreError::CacheError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn get_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingSignup>, SignupCacheStoreError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = conn
            .get(pending_key(email))
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;

        match value {
            Some(json) => PendingSignup::from_json(&json)
                .map(Some)
                .map_err(|e| SignupCacheStoreError::CacheError(e.to_string())),
            None => Ok(None),
        }
    }

    #[tracing::instrument(name = "Removing pending signup from Redis", skip_all)]
    async fn remove(&self, email: &Email) -> Result<(), SignupCacheStoreError> {
        let mut conn = self.conn.lock().await;
        let _: () = conn
            .del(&[otp_key(email), pending_key(email)])
            .map_err(|e| SignupCacheStoreError::CacheError(e.to_string()))?;
        Ok(())
    }
}

const OTP_KEY_PREFIX: &str = "otp:";
const PENDING_KEY_PREFIX: &str = "user:";

fn otp_key(email: &Email) -> String {
    format!("{}{}", OTP_KEY_PREFIX, email.as_ref().expose_secret())
}

fn pending_key(email: &Email) -> String {
    format!("{}{}", PENDING_KEY_PREFIX, email.as_ref().expose_secret())
}
