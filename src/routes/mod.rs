//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The editor loads and saves plans through the schematics endpoints. Every
//! request is traced, and CORS is open so the editor can be served from
//! another origin.

pub mod schematics;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/schematics", post(schematics::create_schematic))
        .route(
            "/api/schematics/{id}",
            get(schematics::get_schematic)
                .put(schematics::replace_schematic)
                .delete(schematics::delete_schematic),
        )
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
