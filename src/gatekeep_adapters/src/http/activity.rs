use chrono::Utc;

use gatekeep_core::{ActivityLogStore, UserStore, Username};

/// Record an audit entry and bump the user's `last_activity` stamp.
///
/// Auditing never fails the request that triggered it; errors are logged
/// and dropped.
pub async fn record<U, A>(user_store: &U, activity_log: &A, username: &Username, action: &str)
where
    U: UserStore,
    A: ActivityLogStore,
{
    if let Err(e) = activity_log.record(username, action, Utc::now()).await {
        tracing::warn!(%username, action, error = %e, "failed to write activity log entry");
    }

    if let Err(e) = user_store.record_activity(username).await {
        tracing::warn!(%username, error = %e, "failed to update last activity");
    }
}
