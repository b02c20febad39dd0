use gatekeep_adapters::config::ServiceSettings;
use redis::{Client, RedisResult};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connect to Postgres and bring the schema up to date.
pub async fn configure_postgresql(settings: &ServiceSettings) -> color_eyre::Result<PgPool> {
    let pg_pool = get_postgres_pool(settings.postgres.url.expose_secret()).await?;

    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    Ok(pg_pool)
}

pub fn configure_redis(settings: &ServiceSettings) -> color_eyre::Result<redis::Connection> {
    let conn = get_redis_client(&settings.redis.host_name)?.get_connection()?;
    Ok(conn)
}

pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
