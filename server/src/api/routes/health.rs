//! Health check endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::PostgresService;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: PoolHealth,
}

/// Connection pool snapshot; reading it performs no I/O
#[derive(Serialize, ToSchema)]
pub struct PoolHealth {
    pub open: bool,
    pub connections: u32,
    pub idle: usize,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Connection pool is closed", body = HealthResponse)
    )
)]
pub async fn health(State(database): State<Arc<PostgresService>>) -> impl IntoResponse {
    let pool = database.pool();
    let open = !pool.is_closed();
    let status = if open {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if open { "ok" } else { "unavailable" },
            version: env!("CARGO_PKG_VERSION"),
            database: PoolHealth {
                open,
                connections: pool.size(),
                idle: pool.num_idle(),
            },
        }),
    )
}
