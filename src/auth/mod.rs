pub mod validator;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub use validator::{JwksValidator, SecretValidator};

/// Token payload. Only `permissions` is interpreted by the gate; the registered
/// claims are checked by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Either a single audience string or a list of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        permissions: Vec<String>,
        audience: Option<String>,
        issuer: Option<String>,
        expiry_hours: u64,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?
            .timestamp();

        Ok(Self {
            sub: Some(subject.into()),
            iss: issuer,
            aud: audience.map(Value::String),
            permissions: Some(permissions),
            exp,
            iat: now.timestamp(),
        })
    }
}

/// Structured authorization failure: HTTP status, machine-readable reason code
/// and a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub description: String,
}

impl AuthError {
    pub fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    pub fn no_header() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "no_header", "Authorization header is expected.")
    }

    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid_header", description)
    }

    pub fn malformed_token() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "malformed_token", "Authorization malformed.")
    }

    pub fn token_expired() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "token_expired", "Token expired.")
    }

    pub fn incorrect_claims() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    pub fn unparsable_token() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_header", "Unable to parse authentication token.")
    }

    pub fn unknown_key() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_header", "Unable to find the appropriate key.")
    }

    pub fn missing_permissions() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_claims", "Permissions not included in JWT.")
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::FORBIDDEN, "unauthorized", "Permission not found.")
    }
}

/// Verifies a bearer token and returns its claims.
///
/// Failures the client caused come back as `ApiError::Auth`; infrastructure
/// failures (an unreachable key set, for instance) as internal errors.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Claims, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Token lifetime of {0} hours is out of range")]
    InvalidExpiry(u64),
}

/// Sign claims with a shared HS256 secret
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
