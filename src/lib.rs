// Library crate for Environment Monitor
// Exports modules for use by the dashboard binary and tests

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod state;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    create_environment, delete_environment, fallback, get_environment, health, list_environments,
    update_environment,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Environment routes
        .route(
            "/api/environments",
            get(list_environments).post(create_environment),
        )
        .route(
            "/api/environments/{id}",
            get(get_environment)
                .put(update_environment)
                .delete(delete_environment),
        )
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
