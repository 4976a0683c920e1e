//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes (`/api/upload`, `/api/health`)
//! - CORS middleware
//! - The multipart upload form extractor
//! - Error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
use docdrop_core::SubmissionService;
use docdrop_shared::AppConfig;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<AppConfig>,
    /// Upload relay service.
    pub submissions: Arc<SubmissionService>,
}

/// Plain-text liveness probe.
async fn root() -> &'static str {
    "Upload relay — OK"
}

/// Creates the main application router.
///
/// Handlers see the request deadline as a [`middleware::deadline::RequestDeadline`]
/// extension so they can finish before the timeout layer answers 408.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.config.server.request_timeout();
    let cors = middleware::cors::cors_layer(&state.config.server.allow_origin);
    let api = routes::api_routes(&state);

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(from_fn_with_state(timeout, middleware::deadline::stamp_deadline))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
