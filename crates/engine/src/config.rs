//! Environment configuration for the daemon binaries.
//!
//! The engine itself takes injected stores, clock and notifier; only
//! process-level settings live here.
//!
//! Environment variables:
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            database_url,
            log_level,
        })
    }
}
