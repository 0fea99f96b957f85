//! Health check endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub blob_service: BlobServiceStatus,
}

#[derive(Serialize, ToSchema)]
pub struct BlobServiceStatus {
    pub provider: &'static str,
    pub reachable: bool,
}

/// GET /health - Health check endpoint
///
/// Always answers 200; an unreachable blob service only degrades the status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let reachable = state.storage.health_check().await;

    HttpResponse::Ok().json(HealthResponse {
        status: if reachable { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        blob_service: BlobServiceStatus {
            provider: state.storage.provider(),
            reachable,
        },
    })
}
