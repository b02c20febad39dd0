use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::{PgPool, Pool, Postgres, Row, postgres::PgRow};

use gatekeep_core::{Email, Otp, ResetOtp, ResetOtpStore, ResetOtpStoreError};

/// Durable reset-OTP store. The `email` primary key caps each user at one
/// live record; replace runs delete-then-insert in one transaction.
#[derive(Clone)]
pub struct PostgresResetOtpStore {
    pool: PgPool,
}

impl PostgresResetOtpStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresResetOtpStore { pool }
    }
}

fn row_to_record(row: &PgRow) -> Result<ResetOtp, ResetOtpStoreError> {
    let otp: i32 = row
        .try_get("otp")
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;
    let expires_at: DateTime<Utc> = row
        .try_get("expires_at")
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;
    let verified: bool = row
        .try_get("verified")
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

    let otp = Otp::parse(&otp.to_string())
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

    Ok(ResetOtp::parse(otp, expires_at, verified))
}

#[async_trait::async_trait]
impl ResetOtpStore for PostgresResetOtpStore {
    #[tracing::instrument(name = "Replacing reset OTP in PostgreSQL", skip_all)]
    async fn replace(&self, email: &Email, record: ResetOtp) -> Result<(), ResetOtpStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

        sqlx::query("DELETE FROM reset_otps WHERE email = $1")
            .bind(email.as_ref().expose_secret())
            .execute(&mut *tx)
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO reset_otps (email, otp, expires_at, verified) VALUES ($1, $2, $3, $4)",
        )
        .bind(email.as_ref().expose_secret())
        .bind(record.otp().as_u32() as i32)
        .bind(record.expires_at())
        .bind(record.verified())
        .execute(&mut *tx)
        .await
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Looking up reset OTP by code in PostgreSQL", skip_all)]
    async fn find_by_otp(&self, email: &Email, otp: Otp) -> Result<ResetOtp, ResetOtpStoreError> {
        let row = sqlx::query(
            "SELECT otp, expires_at, verified FROM reset_otps WHERE email = $1 AND otp = $2",
        )
        .bind(email.as_ref().expose_secret())
        .bind(otp.as_u32() as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?
        .ok_or(ResetOtpStoreError::RecordNotFound)?;

        row_to_record(&row)
    }

    #[tracing::instrument(name = "Looking up reset OTP in PostgreSQL", skip_all)]
    async fn find(&self, email: &Email) -> Result<ResetOtp, ResetOtpStoreError> {
        let row = sqlx::query("SELECT otp, expires_at, verified FROM reset_otps WHERE email = $1")
            .bind(email.as_ref().expose_secret())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?
            .ok_or(ResetOtpStoreError::RecordNotFound)?;

        row_to_record(&row)
    }

    #[tracing::instrument(name = "Marking reset OTP verified in PostgreSQL", skip_all)]
    async fn mark_verified(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        let result = sqlx::query("UPDATE reset_otps SET verified = TRUE WHERE email = $1")
            .bind(email.as_ref().expose_secret())
            .execute(&self.pool)
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ResetOtpStoreError::RecordNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting reset OTP from PostgreSQL", skip_all)]
    async fn delete(&self, email: &Email) -> Result<(), ResetOtpStoreError> {
        sqlx::query("DELETE FROM reset_otps WHERE email = $1")
            .bind(email.as_ref().expose_secret())
            .execute(&self.pool)
            .await
            .map_err(|e| ResetOtpStoreError::UnexpectedError(e.to_string()))?;

        Ok(())
    }
}
