//! HTTP application wiring (axum router).
//!
//! - `routes.rs`: handlers, one per endpoint
//! - `dto.rs`: response shapes and the `{ success, data, error }` envelope
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use stockbook_store::Database;

use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// tests).
pub fn build_app(db: Arc<Database>) -> Router {
    let auth_state = AuthState { db: db.clone() };

    // Everything except /health requires a valid API key.
    let protected = Router::new()
        .route("/items", get(routes::list_items))
        .route("/items/:id", get(routes::get_item))
        .route("/organisations/:id/items", get(routes::organisation_items))
        .layer(Extension(db))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::api_key_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(protected)
}
