//! Database connection management.

use std::time::Duration;

pub use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connection options for `config`.
///
/// A full URL is parsed as given. Otherwise the parts are set one by one, so
/// credentials never need URL escaping.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    match &config.url {
        Some(url) => url.parse(),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)),
    }
}

/// Open a Postgres pool and verify it with a round trip.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options(config)?)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    info!(
        host = %config.host,
        database = %config.name,
        max_connections = config.max_connections,
        "connected to database"
    );
    Ok(pool)
}
