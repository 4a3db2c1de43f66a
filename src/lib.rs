pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::middleware::{require_permission, PermissionGate};
use crate::state::AppState;

pub use crate::state::StartupError;

/// Full application router with the global layers `config` asks for
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", json_405(get(handlers::public::root)))
        .route("/health", json_405(get(handlers::public::health)))
        .merge(drink_routes(&state))
        .fallback(handlers::public::not_found)
        .with_state(state)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.security.cors_origins))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn drink_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::{delete, patch};
    use handlers::{protected, public};

    Router::new()
        .route(
            "/drinks",
            json_405(get(public::drinks::list).merge(guard(post(protected::drinks::create), state, "post:drinks"))),
        )
        .route(
            "/drinks-detail",
            json_405(guard(get(protected::drinks::detail), state, "get:drinks-detail")),
        )
        .route(
            "/drinks/:id",
            json_405(
                guard(patch(protected::drinks::update), state, "patch:drinks")
                    .merge(guard(delete(protected::drinks::delete), state, "delete:drinks")),
            ),
        )
}

/// Answer unsupported methods on a known path with the JSON envelope.
/// Must be applied after any `merge`, which rejects two custom fallbacks.
fn json_405(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(handlers::public::method_not_allowed)
}

/// Wrap a method router so it only runs for tokens granting `permission`
pub fn guard(route: MethodRouter<AppState>, state: &AppState, permission: &'static str) -> MethodRouter<AppState> {
    let gate = PermissionGate::new(state.validator.clone(), permission);
    route.route_layer(from_fn_with_state(gate, require_permission))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparsable CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
