use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `tracing_subscriber::EnvFilter` directives, used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Requests running longer than this are abandoned
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// `pageSize` used when a listing request omits it
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply embedded migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,

    /// Connection attempts before startup gives up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "device_manager=debug,tower_http=info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> i64 {
    50
}

fn default_database_url() -> String {
    "sqlite:./data/devices.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_run_migrations() -> bool {
    true
}

fn default_connect_attempts() -> u32 {
    3
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: default_database_url(),
            max_connections: default_max_connections(),
            run_migrations: default_run_migrations(),
            connect_attempts: default_connect_attempts(),
        }
    }
}

impl AppConfig {
    /// Reads `DEVICE_MANAGER_*` variables; nested keys use `__`,
    /// e.g. `DEVICE_MANAGER_DATABASE__URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("DEVICE_MANAGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
