use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, Claims, TokenValidator};
use crate::error::ApiError;

/// Authenticated caller, injected into request extensions by the gate
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: Option<String>,
}

/// State of one guarded route: who validates tokens and which permission the
/// route demands
#[derive(Clone)]
pub struct PermissionGate {
    validator: Arc<dyn TokenValidator>,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(validator: Arc<dyn TokenValidator>, permission: &'static str) -> Self {
        Self { validator, permission }
    }

    /// Run the whole check against a set of request headers
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.validator.validate(token).await?;
        check_permission(self.permission, &claims)?;

        Ok(AuthUser { subject: claims.sub })
    }
}

/// Guard middleware; use with `axum::middleware::from_fn_with_state`
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = gate.authorize(request.headers()).await.map_err(|e| {
        tracing::warn!(
            "Rejected {} {} requiring '{}': {}",
            request.method(),
            request.uri().path(),
            gate.permission,
            e
        );
        e
    })?;

    tracing::debug!("Authorized {:?} for '{}'", auth_user.subject, gate.permission);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or_else(AuthError::no_header)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header is not valid text."))?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::invalid_header("Authorization header is empty.")),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header("Authorization header must be bearer token.")),
    }
}

/// Check the required permission against the token's permission claim
pub fn check_permission(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims.permissions.as_ref().ok_or_else(AuthError::missing_permissions)?;

    if !granted.iter().any(|p| p == permission) {
        return Err(AuthError::unauthorized());
    }

    Ok(())
}
