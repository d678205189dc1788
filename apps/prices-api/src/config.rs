//! Configuration for the Prices API

use core_config::{FromEnv, server::ServerConfig};
use core_resilience::CircuitBreakerConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    /// PostgreSQL DSN; unset runs the service on the in-memory sample store
    pub database_url: Option<String>,
    pub breaker: CircuitBreakerConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database_url: std::env::var("DATABASE_URL").ok(),
            breaker: CircuitBreakerConfig::from_env()?,
        })
    }
}
