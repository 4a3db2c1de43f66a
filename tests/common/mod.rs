#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use coffee_shop_api::auth::{generate_jwt, Claims, SecretValidator};
use coffee_shop_api::config::AppConfig;
use coffee_shop_api::database::{DatabaseError, Drink, DrinkStore, Ingredient, MemoryDrinkStore, NewDrink};
use coffee_shop_api::state::AppState;

pub const SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "drinks";
pub const ISSUER: &str = "https://coffee-shop.test/";

pub const ALL: [&str; 4] = ["get:drinks-detail", "post:drinks", "patch:drinks", "delete:drinks"];

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDrinkStore>,
}

impl TestApp {
    /// App over a store holding `water` (id 1) and `matcha latte` (id 2)
    pub fn seeded() -> Self {
        let store = MemoryDrinkStore::with_drinks(vec![
            NewDrink::seed(),
            NewDrink {
                title: "matcha latte".into(),
                recipe: vec![
                    ingredient("matcha", "green", 1),
                    ingredient("milk", "white", 3),
                ],
            },
        ]);
        Self::with_store(store)
    }

    pub fn empty() -> Self {
        Self::with_store(MemoryDrinkStore::new())
    }

    /// App whose store fails every call. `store` is left empty and unused.
    pub fn unavailable() -> Self {
        Self {
            router: router_over(Arc::new(UnavailableStore)),
            store: Arc::new(MemoryDrinkStore::new()),
        }
    }

    fn with_store(store: MemoryDrinkStore) -> Self {
        let store = Arc::new(store);
        let router = router_over(store.clone());
        Self { router, store }
    }

    pub async fn has_drink(&self, id: i64) -> bool {
        matches!(self.store.get(id).await, Ok(Some(_)))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(request(Method::GET, path, token, None)?).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(request(Method::POST, path, token, Some(body))?).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(request(Method::PATCH, path, token, Some(body))?).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(request(Method::DELETE, path, token, None)?).await
    }
}

fn router_over(store: Arc<dyn DrinkStore>) -> Router {
    let validator = Arc::new(SecretValidator::new(SECRET, Some(AUDIENCE), Some(ISSUER)));

    let mut config = AppConfig::for_memory(SECRET);
    config.api.enable_request_logging = false;

    coffee_shop_api::app(AppState::new(store, validator), &config)
}

/// Store standing in for an unreachable database
pub struct UnavailableStore;

fn pool_timeout() -> DatabaseError {
    sqlx::Error::PoolTimedOut.into()
}

#[async_trait]
impl DrinkStore for UnavailableStore {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        Err(pool_timeout())
    }

    async fn get(&self, _id: i64) -> Result<Option<Drink>, DatabaseError> {
        Err(pool_timeout())
    }

    async fn insert(&self, _drink: NewDrink) -> Result<Drink, DatabaseError> {
        Err(pool_timeout())
    }

    async fn update(&self, _drink: &Drink) -> Result<Option<Drink>, DatabaseError> {
        Err(pool_timeout())
    }

    async fn delete(&self, _id: i64) -> Result<bool, DatabaseError> {
        Err(pool_timeout())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(pool_timeout())
    }

    async fn reset(&self) -> Result<(), DatabaseError> {
        Err(pool_timeout())
    }
}

pub fn request(method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(request)
}

pub fn ingredient(name: &str, color: &str, parts: i64) -> Ingredient {
    Ingredient {
        name: name.into(),
        color: color.into(),
        parts,
    }
}

pub fn claims_with(permissions: &[&str]) -> Claims {
    Claims::new(
        "auth0|test-user",
        permissions.iter().map(|p| p.to_string()).collect(),
        Some(AUDIENCE.into()),
        Some(ISSUER.into()),
        1,
    )
    .expect("test claims")
}

pub fn sign(claims: &Claims) -> String {
    generate_jwt(claims, SECRET).expect("sign test token")
}

/// Valid token granting exactly `permissions`
pub fn token(permissions: &[&str]) -> String {
    sign(&claims_with(permissions))
}

/// Manager token: every permission
pub fn manager() -> String {
    token(&ALL)
}
