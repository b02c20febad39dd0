use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use tokio::sync::RwLock;

use gatekeep_core::{ActivityLogStore, ActivityLogStoreError, Username};

/// One audit row: who did what, when.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub username: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default, Clone)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait::async_trait]
impl ActivityLogStore for InMemoryActivityLog {
    async fn record(
        &self,
        username: &Username,
        action: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ActivityLogStoreError> {
        self.entries.write().await.push(ActivityEntry {
            username: username.as_str().to_owned(),
            action: action.to_owned(),
            timestamp,
        });
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresActivityLog { pool }
    }
}

#[async_trait::async_trait]
impl ActivityLogStore for PostgresActivityLog {
    #[tracing::instrument(name = "Writing activity log row", skip_all)]
    async fn record(
        &self,
        username: &Username,
        action: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ActivityLogStoreError> {
        sqlx::query("INSERT INTO activity_log (username, action, occurred_at) VALUES ($1, $2, $3)")
            .bind(username.as_str())
            .bind(action)
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| ActivityLogStoreError::StoreError(e.to_string()))?;

        Ok(())
    }
}
