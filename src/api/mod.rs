//! API Routes for the CRM notes service
//!
//! This module combines all API routes into a single router.

mod notes;
pub mod status;

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use notes::{CreateNoteRequest, ListNotesResponse, NoteResponse, MAX_NOTE_LENGTH};

/// Build the complete API router.
///
/// Route structure:
/// - /contacts/:contact_id/notes - Contact notes
/// - /health, /health/ready - Health checks
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/contacts", notes::routes())
}

/// Build the application with tracing, CORS and request timeout applied.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
