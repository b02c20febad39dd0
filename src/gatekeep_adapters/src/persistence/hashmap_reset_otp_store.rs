use std::collections::HashMap;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use gatekeep_core::{Email, Otp, ResetOtp, ResetOtpStore, ResetOtpStoreError};

/// In-memory reset-OTP store. A single `RwLock` write section per operation
/// keeps replace and verify serialized per user.
#[derive(Default, Clone)]
pub struct HashmapResetOtpStore {
    records: Arc<RwLock<HashMap<String, ResetOtp>>>,
}

impl HashmapResetOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(email: &Email) -> String {
    email.as_ref().expose_secret().clone()
}

#[async_trait::async_trait]
impl ResetOtpStore for HashmapResetOtpStore {
    async fn replace(&self, email: &Email, record: ResetOtp) -> Result<(), ResetOtpStoreError> {
        self.records.write().await.insert(key(email), record);
        Ok(())
    }

    async fn find_by_otp(&self, email: &Email, otp: Otp) -> Result<ResetOtp, ResetOtpStoreError> {
        self.records
            .read()
            .await
            .get(&key(email))
            .filter(|record| record.otp() == otp)
            .cloned()
            .ok_or(ResetOtpStoreError::RecordNotFound)
    }

    async fn find(&self, email: &Email) -> Result<ResetOtp, ResetOtpStoreError> {
        self.records
            .read()
            .await
            .get(&key(email))
            .cloned()
            .ok_or(ResetOtpStoreError::RecordNotFound)
    }

    async fn mark_verified(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&key(email))
            .ok_or(ResetOtpStoreError::RecordNotFound)?;
        *record = ResetOtp::parse(record.otp(), record.expires_at(), true);
        Ok(())
    }

    async fn delete(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        self.records.write().await.remove(&key(email));
        Ok(())
    }
}
