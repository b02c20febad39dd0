use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use gatekeep_core::{Email, UserStore, UserStoreError, Username};

use crate::auth::{JwtConfig, extract_subject, is_token_valid};

use super::routes::error::AuthApiError;

/// Endpoints reachable without a token. Everything else goes through the
/// bearer check below.
const PUBLIC_PATHS: [&str; 4] = ["/register", "/verify-otp", "/login", "/refresh"];
const PUBLIC_PREFIX: &str = "/forgetPassword/";

/// The authenticated principal, attached as a request extension once the
/// token checks out.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: Username,
    pub email: Email,
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || path.starts_with(PUBLIC_PREFIX)
}

/// Per-request bearer-token gate, mounted with `middleware::from_fn_with_state`.
///
/// Distinguishes three rejections: no token at all, a token that does not
/// parse against our secret, and a well-formed token that is expired or no
/// longer matches a live user. The second tells the client to log in again,
/// the third to refresh.
#[tracing::instrument(name = "Bearer auth", skip_all, fields(path = %request.uri().path()))]
pub async fn bearer_auth<U>(
    State((user_store, config)): State<(U, JwtConfig)>,
    mut request: Request,
    next: Next,
) -> Response
where
    U: UserStore + Clone + Send + Sync + 'static,
{
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let token = match bearer_token(&request) {
        Some(token) => token,
        None => {
            return AuthApiError::AuthenticationError("Missing authentication token".to_owned())
                .into_response();
        }
    };

    let username = match extract_subject(token, &config) {
        Ok(username) => username,
        Err(_) => {
            return AuthApiError::AuthenticationError(
                "Invalid or expired access token. Please refresh.".to_owned(),
            )
            .into_response();
        }
    };

    let user = match user_store.find_by_username(&username).await {
        Ok(user) => user,
        Err(UserStoreError::UserNotFound) => {
            return AuthApiError::AuthenticationError(
                "Access token expired. Please refresh.".to_owned(),
            )
            .into_response();
        }
        Err(e) => {
            return AuthApiError::UnexpectedError(e.to_string()).into_response();
        }
    };

    if !is_token_valid(token, &username, &config) {
        return AuthApiError::AuthenticationError(
            "Access token expired. Please refresh.".to_owned(),
        )
        .into_response();
    }

    request.extensions_mut().insert(CurrentUser {
        username,
        email: user.email().clone(),
    });

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
