//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for ID patterns and sequences
//! - Mapping from domain errors to JSON error responses

pub mod routes;

use std::sync::Arc;

use axum::Router;
use complihr_core::sequencing::IdSequencer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identifier sequencer.
    pub sequencer: Arc<IdSequencer>,
}

impl AppState {
    /// Creates the state around a sequencer.
    #[must_use]
    pub fn new(sequencer: IdSequencer) -> Self {
        Self {
            sequencer: Arc::new(sequencer),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
