use std::sync::Arc;

use thiserror::Error;

use crate::auth::{JwksValidator, SecretValidator, TokenValidator};
use crate::config::{AppConfig, AuthConfig, ConfigError, StoreBackend};
use crate::database::{DatabaseError, DatabaseManager, DrinkStore, MemoryDrinkStore, PgDrinkStore};

/// Handles every request handler is given. Owned by the process entry point.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrinkStore>,
    pub validator: Arc<dyn TokenValidator>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("drink store unavailable: {0}")]
    Store(#[from] DatabaseError),

    #[error("invalid identity provider domain: {0}")]
    InvalidDomain(#[from] url::ParseError),
}

impl AppState {
    pub fn new(store: Arc<dyn DrinkStore>, validator: Arc<dyn TokenValidator>) -> Self {
        Self { store, validator }
    }

    /// Open the configured store and token validator
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store = Self::open_store(config).await?;
        let validator = Self::validator(&config.auth)?;
        Ok(Self::new(store, validator))
    }

    pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn DrinkStore>, StartupError> {
        match config.database.store {
            StoreBackend::Postgres => {
                if config.database.url.is_none() {
                    return Err(ConfigError::MissingDatabaseUrl.into());
                }
                let pool = DatabaseManager::connect(&config.database).await?;
                Ok(Arc::new(PgDrinkStore::open(pool).await?))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory drink store; drinks are lost on exit");
                Ok(Arc::new(MemoryDrinkStore::new()))
            }
        }
    }

    /// A shared secret wins over the identity provider when both are set
    pub fn validator(auth: &AuthConfig) -> Result<Arc<dyn TokenValidator>, StartupError> {
        if let Some(secret) = &auth.jwt_secret {
            tracing::info!("Validating HS256 tokens with the configured shared secret");
            return Ok(Arc::new(SecretValidator::new(
                secret,
                auth.audience.as_deref(),
                auth.issuer.as_deref(),
            )));
        }

        let domain = auth.domain.as_deref().ok_or(ConfigError::NoAuthSource)?;
        tracing::info!("Validating RS256 tokens against {}", domain);
        Ok(Arc::new(JwksValidator::new(
            domain,
            auth.audience.as_deref(),
            auth.issuer.as_deref(),
        )?))
    }
}
