// ============================================================================
// PROGRAM CATALOG EDITOR
// ============================================================================

// - GET/POST /programs: read or replace the catalog file
// - GET /access: probe the single-editor session without taking it
// - Everything else: static files for the editor page
// - Backup of the previous catalog before every save

pub mod clock;
pub mod config;
pub mod dto;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod models;
pub mod routes;
pub mod session;
pub mod states;
pub mod storage;

pub use config::Config;
pub use states::AppState;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Largest save form accepted, same ceiling the editor has always had.
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Build the router
///
/// Only the catalog endpoints pass through the request logger; static files
/// are left to the trace layer.
pub fn app(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route(
            "/programs",
            get(routes::get_programs)
                .post(routes::save_programs)
                .layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .route("/access", get(routes::probe_access))
        .route_layer(middleware::from_fn(logging::log_requests))
        .fallback_service(ServeDir::new(&config.public_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}
