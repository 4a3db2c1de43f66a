use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub store: StoreBackend,
    pub max_connections: u32,
    /// Pool acquire timeout, seconds
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `coffee.eu.auth0.com`
    pub domain: Option<String>,
    pub audience: Option<String>,
    /// Defaults to `https://<domain>/` when validating against the provider
    pub issuer: Option<String>,
    /// Shared HS256 secret. When set, tokens are validated locally instead of
    /// against the provider's key set.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no token validation configured: set AUTH0_DOMAIN or AUTH_JWT_SECRET")]
    NoAuthSource,

    #[error("DATABASE_URL is required for the postgres drink store")]
    MissingDatabaseUrl,

    #[error("unknown drink store backend: {0}")]
    UnknownStore(String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Some(v) = env::var("COFFEE_SHOP_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DRINK_STORE") {
            self.database.store = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::UnknownStore(v)),
            };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH0_DOMAIN") {
            self.auth.domain = Some(v);
        }
        if let Ok(v) = env::var("API_AUDIENCE") {
            self.auth.audience = Some(v);
        }
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.auth.issuer = Some(v);
        }
        if let Ok(v) = env::var("AUTH_JWT_SECRET") {
            self.auth.jwt_secret = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("AUTH_TOKEN_EXPIRY_HOURS") {
            self.auth.token_expiry_hours = v.parse().unwrap_or(self.auth.token_expiry_hours);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.domain.is_none() && self.auth.jwt_secret.is_none() {
            return Err(ConfigError::NoAuthSource);
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                store: StoreBackend::Postgres,
                max_connections: 5,
                connection_timeout: 30,
            },
            auth: AuthConfig {
                domain: None,
                audience: None,
                issuer: None,
                jwt_secret: None,
                token_expiry_hours: 24 * 7, // 1 week
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig { cors_origins: Vec::new() },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                store: StoreBackend::Postgres,
                max_connections: 10,
                connection_timeout: 10,
            },
            auth: AuthConfig {
                domain: None,
                audience: None,
                issuer: None,
                jwt_secret: None,
                token_expiry_hours: 24,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig { cors_origins: Vec::new() },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                store: StoreBackend::Postgres,
                max_connections: 20,
                connection_timeout: 5,
            },
            auth: AuthConfig {
                domain: None,
                audience: None,
                issuer: None,
                jwt_secret: None,
                token_expiry_hours: 4,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig { cors_origins: Vec::new() },
        }
    }

    /// Config for in-process use (tests, embedding): memory store, shared secret
    pub fn for_memory(jwt_secret: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.database.store = StoreBackend::Memory;
        config.auth.jwt_secret = Some(jwt_secret.into());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 5000);
        assert!(config.api.enable_request_logging);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 20);
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.auth.token_expiry_hours, 4);
    }

    #[test]
    fn validation_requires_an_auth_source() {
        let mut config = AppConfig::development();
        config.database.store = StoreBackend::Memory;
        assert_eq!(config.validate(), Err(ConfigError::NoAuthSource));

        config.auth.domain = Some("coffee.eu.auth0.com".into());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn memory_config_is_self_contained() {
        let config = AppConfig::for_memory("secret");
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.database.store, StoreBackend::Memory);
        assert!(config.database.url.is_none());
    }
}
