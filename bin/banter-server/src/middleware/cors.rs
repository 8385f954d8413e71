use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// Restrict origins to `BANTER_CORS_ORIGINS` when set, wildcard otherwise.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        // Wildcard – suitable for development; set BANTER_CORS_ORIGINS in production.
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::routing::get;
    use http::{Request, header};
    use tower::ServiceExt;

    use crate::testing::test_config;

    async fn allowed_origin(origins: Option<&str>, origin: &str) -> Option<String> {
        let mut config = test_config(true);
        config.cors_allowed_origins = origins.map(str::to_owned);
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(cors_layer(&config));

        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn wildcard_without_configuration() {
        assert_eq!(allowed_origin(None, "https://a.example").await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn configured_origins_are_enforced() {
        let origins = Some("https://a.example, https://b.example");
        assert_eq!(
            allowed_origin(origins, "https://b.example").await.as_deref(),
            Some("https://b.example")
        );
        assert_eq!(allowed_origin(origins, "https://evil.example").await, None);
    }
}
