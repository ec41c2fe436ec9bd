#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::{DateTime, Utc};
use device_manager::{
    build_router,
    config::DatabaseConfig,
    db::{self, SqliteUnitOfWork},
    domain::{Device, DeviceState, Repository, UnitOfWork},
    AppState,
};
use sqlx::SqlitePool;

/// Fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        run_migrations: true,
        connect_attempts: 1,
    };
    db::init_pool(&config).await.expect("in-memory database")
}

pub fn test_app(pool: SqlitePool) -> Router {
    build_router(Arc::new(AppState {
        pool,
        default_page_size: 50,
        request_timeout: Duration::from_secs(10),
    }))
}

/// Persists a device through its own unit of work.
pub async fn seed(
    pool: &SqlitePool,
    name: &str,
    brand: &str,
    state: DeviceState,
    creation_time: DateTime<Utc>,
) -> Device {
    let device = Device::create_at(
        Some(name.to_string()),
        Some(brand.to_string()),
        Some(state),
        creation_time,
    );
    let uow = SqliteUnitOfWork::new(pool.clone());
    uow.add(device.clone()).await.unwrap();
    uow.save().await.unwrap();
    device
}
