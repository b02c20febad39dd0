use axum::{Extension, Json, extract::State, response::IntoResponse};
use secrecy::ExposeSecret;
use serde::Serialize;

use gatekeep_core::{ActivityLogStore, UserStore};

use crate::http::{activity, bearer_auth::CurrentUser};

use super::error::AuthApiError;

#[derive(Serialize)]
pub struct MeResponseBody {
    pub username: String,
    pub email: String,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<String>,
    #[serde(rename = "lastActivity")]
    pub last_activity: Option<String>,
}

#[tracing::instrument(name = "Me", skip_all)]
pub async fn me<U, A>(
    State((user_store, activity_log)): State<(U, A)>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    A: ActivityLogStore + 'static,
{
    let user = user_store.find_by_username(&current_user.username).await?;

    activity::record(&user_store, &activity_log, &current_user.username, "me").await;

    let body = MeResponseBody {
        username: user.username().as_str().to_owned(),
        email: user.email().as_ref().expose_secret().clone(),
        last_login: user.last_login().map(|t| t.to_rfc3339()),
        last_activity: user.last_activity().map(|t| t.to_rfc3339()),
    };

    Ok(Json(body))
}
