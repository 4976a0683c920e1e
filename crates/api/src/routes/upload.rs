//! Upload relay route.

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::post,
};
use docdrop_core::submission::SubmissionReceipt;
use serde::Serialize;

use crate::{
    AppState, error::ApiError, extractors::UploadForm, middleware::deadline::RequestDeadline,
};

/// Creates the upload routes with the given request body limit.
pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always true.
    pub ok: bool,
    /// Reference, client echo and staged file names.
    #[serde(flatten)]
    pub receipt: SubmissionReceipt,
}

/// POST `/upload` - Validate, relay by email, and clean up.
async fn upload(
    State(state): State<AppState>,
    deadline: Option<Extension<RequestDeadline>>,
    UploadForm(request): UploadForm,
) -> Result<Json<UploadResponse>, ApiError> {
    let deadline = deadline.map(|Extension(RequestDeadline(at))| at);
    let receipt = state.submissions.submit(request, deadline).await?;
    Ok(Json(UploadResponse { ok: true, receipt }))
}
