//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{self, health};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::PostgresService;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(
            &app.config.server.host,
            app.config.server.port,
            &app.config.server.cors_origins,
        );

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let host = app.config.server.host.clone();
        let port = app.config.server.port;

        let router = build_router(app.database.clone(), &allowed_origins);

        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", host, port))?;
        tracing::debug!(addr = ?listener.local_addr().ok(), "API server listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble the full application router
pub fn build_router(database: Arc<PostgresService>, allowed_origins: &AllowedOrigins) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .with_state(database.clone());

    let api_routes = health_routes.merge(routes::resource_routes(database));

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1", api_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::core::config::PostgresConfig;

    const RESOURCES: &[&str] = &[
        "account-categories",
        "accounts",
        "asset-categories",
        "funds",
        "holdings",
        "portfolios",
        "portfolio-holding-mappings",
        "portfolio-asset-category-mappings",
        "contributions",
        "expense-categories",
        "expenses",
    ];

    /// Router over a pool that never connects; only paths that fail before
    /// touching the database are exercised.
    fn router() -> Router {
        let config = PostgresConfig {
            url: "postgres://tracker@127.0.0.1:1/finance".to_string(),
            ..Default::default()
        };
        let database = Arc::new(PostgresService::connect_lazy(&config).unwrap());
        build_router(database, &AllowedOrigins::new("127.0.0.1", 8080, &[]))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/api/v1/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["database"]["open"], true);
    }

    #[tokio::test]
    async fn test_openapi_json_served() {
        let (status, body) = send(get("/api/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Finance Tracker API");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(get("/api/v1/budgets")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_every_resource_rejects_non_uuid_id() {
        for resource in RESOURCES {
            let (status, body) = send(get(&format!("/api/v1/{}/not-a-uuid", resource))).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "resource {}", resource);
            assert_eq!(body["code"], "INVALID_ID", "resource {}", resource);
        }
    }

    #[tokio::test]
    async fn test_every_resource_rejects_unknown_filter() {
        for resource in RESOURCES {
            let (status, body) = send(get(&format!("/api/v1/{}?color=red", resource))).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "resource {}", resource);
            assert_eq!(body["code"], "QUERY_PARSE_ERROR", "resource {}", resource);
        }
    }

    #[tokio::test]
    async fn test_every_resource_rejects_empty_batch() {
        for resource in RESOURCES {
            let (status, body) = send(json("POST", &format!("/api/v1/{}", resource), "[]")).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "resource {}", resource);
            assert_eq!(body["code"], "VALIDATION_ERROR", "resource {}", resource);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_object_body() {
        let (status, body) = send(json(
            "POST",
            "/api/v1/account-categories",
            r#"{"name": "Retirement"}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "JSON_PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_create_validates_each_item() {
        let body = format!(
            r#"[{{"category": {{"uuid": "{}"}}, "name": "Roth IRA", "amount": -5}}]"#,
            Uuid::new_v4()
        );
        let (status, body) = send(json("POST", "/api/v1/accounts", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Value must not be negative");
    }

    #[tokio::test]
    async fn test_update_validates_body() {
        let uri = format!("/api/v1/portfolios/{}", Uuid::new_v4());
        let (status, body) = send(json("PUT", &uri, r#"{"name": ""}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_rejects_bad_id_list() {
        let (status, body) = send(get("/api/v1/holdings?funds=VTSAX")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_UUID");
    }

    #[tokio::test]
    async fn test_list_rejects_blank_list_filter() {
        for uri in [
            "/api/v1/expenses?categories=",
            "/api/v1/accounts?categories=",
            "/api/v1/holdings?accounts=",
        ] {
            let (status, body) = send(get(uri)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
            assert_eq!(body["code"], "EMPTY_FILTER", "uri {}", uri);
        }
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_date_range() {
        let (status, body) =
            send(get("/api/v1/expenses?start=2024-02-01&end=2024-01-01")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_local_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/accounts")
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:8080"
        );
    }
}
