//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always true while the process serves requests.
    pub ok: bool,
    /// Mail credentials and owner address are all configured.
    pub email: bool,
    /// Client receipts are enabled.
    pub client_receipt: bool,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        email: state.config.email.is_configured(),
        client_receipt: state.config.email.send_client_receipt,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
