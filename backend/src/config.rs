//! Configuration management for the Rice Production Management System
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PMS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::forecasting::{
    ForecastSettings, MIN_RECORDS_FOR_VALIDATION, MIN_SARIMA_SEASONS, MIN_SEASONS_REQUIRED,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Forecasting thresholds
    pub forecast: ForecastSettings,

    /// Activity log configuration
    pub activity: ActivityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivityConfig {
    /// Entries kept before the oldest are evicted
    pub capacity: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("forecast.min_seasons", MIN_SEASONS_REQUIRED as u64)?
            .set_default("forecast.min_sarima_seasons", MIN_SARIMA_SEASONS as u64)?
            .set_default("forecast.min_validation_records", MIN_RECORDS_FOR_VALIDATION as u64)?
            .set_default("activity.capacity", 1000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PMS_ prefix)
            .add_source(
                Environment::with_prefix("PMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
