//! HTTP REST API routes

mod record_routes;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use record_routes::*;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Character routes
        .route("/api/characters/{name}", get(record_routes::get_character))
        .route(
            "/api/characters/{name}/inventory",
            get(record_routes::get_character_inventory),
        )
        // Item routes
        .route("/api/items/{name}", get(record_routes::get_item))
        // Feat routes
        .route("/api/feats/{name}", get(record_routes::get_feat))
}
