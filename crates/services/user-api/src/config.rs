//! User API configuration.

use std::env;

use common::{DatabaseConfig, ServiceConfig};

/// Service name attached to server log events
pub const SERVICE_NAME: &str = "user-api";

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// User API configuration.
#[derive(Debug, Clone)]
pub struct UserApiConfig {
    /// HTTP server settings
    pub server: ServiceConfig,
    /// Connection pool settings
    pub database: DatabaseConfig,
}

impl UserApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            server: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                host: env::var("USER_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: env::var("USER_API_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            },
            database: DatabaseConfig {
                url: env::var("USER_API_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_connections),
                acquire_timeout_seconds: env::var("DATABASE_ACQUIRE_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.acquire_timeout_seconds),
            },
        }
    }
}

impl Default for UserApiConfig {
    fn default() -> Self {
        Self {
            server: ServiceConfig {
                service_name: SERVICE_NAME.to_string(),
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig::default(),
        }
    }
}
