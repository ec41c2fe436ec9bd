pub mod api;
pub mod application;
pub mod config;
pub mod db;
pub mod domain;

use sqlx::SqlitePool;
use std::time::Duration;

pub use api::build_router;

// ─── App State ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub default_page_size: i64,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(pool: SqlitePool, app_config: &config::AppConfig) -> Self {
        AppState {
            pool,
            default_page_size: app_config.default_page_size,
            request_timeout: app_config.request_timeout(),
        }
    }
}
