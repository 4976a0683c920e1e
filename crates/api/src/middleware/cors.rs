//! Cross-origin policy.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Builds the CORS layer from the `ALLOW_ORIGIN` setting.
///
/// `*` (or an empty value) allows any origin. Otherwise the value is a
/// comma-separated list of exact origins. Credentials are never allowed.
pub fn cors_layer(allow_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let trimmed = allow_origin.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, error = %e, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect();

    info!("CORS: {} allowed origin(s)", origins.len());
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn app(allow_origin: &str) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(allow_origin))
    }

    async fn allowed_origin(allow_origin: &str, origin: &str) -> Option<String> {
        let response = app(allow_origin)
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_wildcard_allows_any_origin() {
        assert_eq!(
            allowed_origin("*", "https://anywhere.example").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_listed_origin_is_echoed() {
        let list = "https://www.taxlakay.com, https://taxlakay.com";
        assert_eq!(
            allowed_origin(list, "https://taxlakay.com").await.as_deref(),
            Some("https://taxlakay.com")
        );
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_header() {
        assert_eq!(
            allowed_origin("https://www.taxlakay.com", "https://evil.example").await,
            None
        );
    }
}
