// ============================================================================
// BLOG POST DETAIL API
// ============================================================================

// - Post detail with related posts by shared category
// - Category / tag navigation listings
// - Newsletter subscriptions
// - Remote data store with a local persisted fallback
// - Structured logging and request tracing

pub mod config;
pub mod dto;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod states;
pub mod store;

pub use states::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/posts", get(routes::get_posts))
        .route("/posts/{id}", get(routes::get_post))
        .route("/posts/{id}/related", get(routes::get_related_posts))
        .route("/subscribe", post(routes::subscribe))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
