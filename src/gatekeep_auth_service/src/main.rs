use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use gatekeep_adapters::{
    config::ServiceSettings,
    email::PostmarkEmailClient,
    persistence::{
        PostgresActivityLog, PostgresResetOtpStore, PostgresUserStore, RedisSignupCache,
    },
};
use gatekeep_auth_service::{AuthService, configure_postgresql, configure_redis, init_tracing};
use gatekeep_core::Email;
use reqwest::Client as HttpClient;
use secrecy::Secret;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Local overrides from .env, if one is present
    let _ = dotenvy::dotenv();

    let settings = ServiceSettings::load()?;

    let pg_pool = configure_postgresql(&settings).await?;
    let redis_conn = Arc::new(Mutex::new(configure_redis(&settings)?));

    let user_store = PostgresUserStore::new(pg_pool.clone());
    let signup_cache = RedisSignupCache::new(redis_conn);
    let reset_otp_store = PostgresResetOtpStore::new(pg_pool.clone());
    let activity_log = PostgresActivityLog::new(pg_pool);

    let http_client = HttpClient::builder()
        .timeout(settings.email_client_timeout())
        .build()?;
    let sender = Email::try_from(Secret::new(settings.email_client.sender.clone()))
        .map_err(|e| eyre!("invalid sender address: {e}"))?;
    let email_client = PostmarkEmailClient::new(
        settings.email_client.base_url.clone(),
        sender,
        settings.email_client.auth_token.clone(),
        http_client,
    );

    let service = AuthService::new(
        user_store,
        signup_cache,
        reset_otp_store,
        activity_log,
        email_client,
        settings.jwt_config(),
        settings.otp_policy(),
    );

    let allowed_origins = settings.allowed_origins();
    let allowed_origins = (!allowed_origins.is_empty()).then_some(allowed_origins);

    let listener = tokio::net::TcpListener::bind(&settings.app.address).await?;
    service.run_standalone(listener, allowed_origins).await?;

    Ok(())
}
