//! Route definitions and router construction.
//!
//! Axum 0.8 rejects unsupported methods with a bare 405; the JSON routes
//! install a method fallback so clients always get the JSON error body.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::bootstrap::{AppContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration. `None` means same-origin only.
fn build_cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    match config {
        CorsConfig::SameOrigin => None,
        CorsConfig::AllowAll => Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(target: "ytgrab.http", origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            Some(
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        }
    }
}

/// Create the main Axum router.
///
/// # Path Parameter Syntax
/// Job ids travel in the query string (`/status?id=...`), not the path.
pub fn create_router(ctx: AppContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    let router = Router::new()
        .route("/", get(handlers::index::page))
        .route("/health", get(health_check))
        .route(
            "/download",
            post(handlers::downloads::submit).fallback(handlers::method_not_allowed),
        )
        .route(
            "/status",
            get(handlers::status::get).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match build_cors_layer(cors_config) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
