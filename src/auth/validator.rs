use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use url::Url;

use super::{AuthError, Claims, TokenValidator};
use crate::error::ApiError;

/// Map a `jsonwebtoken` decode failure onto the gate's reason codes
fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::incorrect_claims()
        }
        _ => {
            tracing::debug!("Token decode failed: {}", err);
            AuthError::unparsable_token()
        }
    }
}

fn build_validation(algorithm: Algorithm, audience: Option<&str>, issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(algorithm);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }
    if let Some(iss) = issuer {
        validation.set_issuer(&[iss]);
    }
    validation
}

/// HS256 validation against a shared secret (local development and tests)
pub struct SecretValidator {
    key: DecodingKey,
    validation: Validation,
}

impl SecretValidator {
    pub fn new(secret: &str, audience: Option<&str>, issuer: Option<&str>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: build_validation(Algorithm::HS256, audience, issuer),
        }
    }
}

#[async_trait]
impl TokenValidator for SecretValidator {
    async fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        decode_header(token).map_err(|_| AuthError::malformed_token())?;

        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(classify)?;
        Ok(data.claims)
    }
}

/// RS256 validation against the identity provider's published key set.
/// The key set is fetched for every token; nothing is cached.
pub struct JwksValidator {
    jwks_url: Url,
    validation: Validation,
    client: reqwest::Client,
}

impl JwksValidator {
    /// Validator for an Auth0-style tenant. The issuer defaults to `https://<domain>/`.
    pub fn new(domain: &str, audience: Option<&str>, issuer: Option<&str>) -> Result<Self, url::ParseError> {
        let jwks_url = Self::jwks_url(domain)?;
        let default_issuer = format!("https://{}/", domain.trim_end_matches('/'));

        Ok(Self::with_jwks_url(
            jwks_url,
            audience,
            issuer.unwrap_or(&default_issuer),
        ))
    }

    /// Validator reading keys from an explicit key-set location
    pub fn with_jwks_url(jwks_url: Url, audience: Option<&str>, issuer: &str) -> Self {
        Self {
            jwks_url,
            validation: build_validation(Algorithm::RS256, audience, Some(issuer)),
            client: reqwest::Client::new(),
        }
    }

    fn jwks_url(domain: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("https://{}/", domain.trim_end_matches('/')))?.join(".well-known/jwks.json")
    }

    async fn fetch_keys(&self) -> Result<JwkSet, reqwest::Error> {
        self.client
            .get(self.jwks_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await
    }
}

#[async_trait]
impl TokenValidator for JwksValidator {
    async fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        let header = decode_header(token).map_err(|_| AuthError::malformed_token())?;
        let kid = header.kid.ok_or_else(AuthError::malformed_token)?;

        let keys = self.fetch_keys().await.map_err(|e| {
            tracing::error!("Failed to fetch signing keys from {}: {}", self.jwks_url, e);
            ApiError::internal_server_error()
        })?;

        let jwk = keys.find(&kid).ok_or_else(AuthError::unknown_key)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|_| AuthError::unknown_key())?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(classify)?;
        Ok(data.claims)
    }
}
