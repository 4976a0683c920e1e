//! Request deadline shared with handlers.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

/// Instant at which the request timeout fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline(pub Instant);

/// Stamps each request with the instant its timeout expires.
pub async fn stamp_deadline(
    State(timeout): State<Duration>,
    mut request: Request,
    next: Next,
) -> Response {
    request
        .extensions_mut()
        .insert(RequestDeadline(Instant::now() + timeout));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router, body::Body, http::Request, middleware::from_fn_with_state,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_deadline_is_timeout_after_arrival() {
        let before = Instant::now();
        let app = Router::new()
            .route(
                "/",
                get(move |Extension(RequestDeadline(at)): Extension<RequestDeadline>| async move {
                    format!("{}", at.duration_since(before).as_millis())
                }),
            )
            .layer(from_fn_with_state(Duration::from_secs(3), stamp_deadline));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let millis: u64 = std::str::from_utf8(&bytes).unwrap().parse().unwrap();
        assert!((3000..4000).contains(&millis));
    }
}
