mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::resolver::Resolver;

pub fn create_router(resolver: Arc<Resolver>) -> Router {
    let api = Router::new()
        // Lookups
        .route("/molecules", get(handlers::resolve_molecule))
        .route("/descriptors", get(handlers::compute_descriptors))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(resolver)
}
