//! Shared application state.

use sqlx::PgPool;

/// Shared application state, injected into Axum handlers via the `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
