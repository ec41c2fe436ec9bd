pub mod models;
pub mod queries;
pub mod unit_of_work;

pub use unit_of_work::{SqliteDeviceQueries, SqliteUnitOfWork};

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, time::Duration};

use crate::config::DatabaseConfig;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(3);

pub async fn init_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    // Parse the URL into connect options and enable file creation
    let connect_opts = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true);

    // Ensure the parent directory exists before sqlx tries to open the file
    if let Some(filename) = connect_opts.clone().get_filename().to_str() {
        if filename != ":memory:" {
            if let Some(parent) = std::path::Path::new(filename).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let pool = connect_with_retry(connect_opts, config).await?;

    if config.run_migrations {
        tracing::info!("Applying migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied.");
    }

    tracing::info!("Database initialized at {}", config.url);
    Ok(pool)
}

/// Transient connection failures are retried with a doubling delay.
async fn connect_with_retry(
    connect_opts: SqliteConnectOptions,
    config: &DatabaseConfig,
) -> Result<SqlitePool> {
    let attempts = config.connect_attempts.max(1);
    let mut delay = Duration::from_millis(500);
    let mut attempt = 1;

    loop {
        let result = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_opts.clone())
            .await;

        match result {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    "Database connection attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt,
                    attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
