use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use secrecy::ExposeSecret;

use gatekeep_core::{Email, Otp, PendingSignup, SignupCacheStore, SignupCacheStoreError};

struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// TTL key-value cache for pending registrations. Same key scheme as the
/// Redis adapter, expiry enforced lazily on read.
#[derive(Default, Clone)]
pub struct InMemorySignupCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl InMemorySignupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_live(&self, key: &str) -> Option<String> {
        // The read guard must be released before removing a stale entry.
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }
}

#[async_trait::async_trait]
impl SignupCacheStore for InMemorySignupCache {
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
        let expires_at = Utc::now() + ttl;

        self.entries.insert(
            otp_key(email),
            CacheEntry {
                value: otp.to_string(),
                expires_at,
            },
        );
        self.entries.insert(
            pending_key(email),
            CacheEntry {
                value: json,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get_otp(&self, email: &Email) -> Result<Option<Otp>, SignupCacheStoreError> {
        match self.get_live(&otp_key(email)) {
            Some(value) => Otp::parse(&value)
                .map(Some)
                .map_err(|e| SignupCacheStoreError::CacheError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn get_pending(
        &self,
        email: &Email,
    ) -> Result<Option<PendingSignup>, SignupCacheStoreError> {
        match self.get_live(&pending_key(email)) {
            Some(json) => PendingSignup::from_json(&json)
                .map(Some)
                .map_err(|e| SignupCacheStoreError::CacheError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn remove(&self, email: &Email) -> Result<(), SignupCacheStoreError> {
        self.entries.remove(&otp_key(email));
        self.entries.remove(&pending_key(email));
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
