//! Route modules for Factura Server

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod invoices;

/// Headroom for multipart framing on top of the configured file limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().server.cors_origins);
    let body_limit = state.config().upload.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/invoices", invoices::router(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
