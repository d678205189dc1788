use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0 (all interfaces)
    /// - PORT: defaults to 8080
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", "8080")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self { host, port })
    }
}
