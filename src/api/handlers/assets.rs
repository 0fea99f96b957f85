//! Asset upload and deletion endpoints

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::storage::StorageError;
use crate::AppState;

/// Query parameters for uploads
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Original filename; folded into the stored name by the provider
    pub filename: Option<String>,
}

/// Query parameters for deletion
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Asset URL previously returned by an upload
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub upload_time_ms: u64,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

fn error_response(err: &StorageError) -> HttpResponse {
    let (mut builder, code) = match err {
        StorageError::Payload(_) => (HttpResponse::BadRequest(), "INVALID_PAYLOAD"),
        StorageError::MalformedUrl(_) => (HttpResponse::BadRequest(), "MALFORMED_URL"),
        StorageError::RemoteRejection { .. } => (HttpResponse::BadGateway(), "REMOTE_REJECTED"),
        StorageError::Transport(_) => (HttpResponse::GatewayTimeout(), "TRANSPORT_FAILED"),
    };

    builder.json(ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message: err.to_string(),
        },
    })
}

/// POST /api/v1/assets/{collection} - Upload a raw asset body
#[utoipa::path(
    post,
    path = "/api/v1/assets/{collection}",
    tag = "assets",
    params(
        ("collection" = String, Path, description = "Collection the asset belongs to, e.g. products"),
        UploadQuery
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Asset stored", body = UploadResponse),
        (status = 400, description = "Empty payload", body = ErrorResponse),
        (status = 502, description = "Blob service rejected the upload", body = ErrorResponse),
        (status = 504, description = "Blob service unreachable", body = ErrorResponse)
    )
)]
pub async fn upload_asset(
    state: web::Data<AppState>,
    collection: web::Path<String>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let start = Instant::now();
    let collection = collection.into_inner();

    info!(
        collection = %collection,
        size = body.len(),
        "Processing asset upload request"
    );

    match state
        .storage
        .upload_named(body, &collection, query.filename.as_deref())
        .await
    {
        Ok(url) => HttpResponse::Created().json(UploadResponse {
            success: true,
            url,
            upload_time_ms: start.elapsed().as_millis() as u64,
        }),
        Err(e) => {
            warn!(collection = %collection, error = %e, "Asset upload request failed");
            error_response(&e)
        }
    }
}

/// DELETE /api/v1/assets?url=... - Best-effort asset deletion
#[utoipa::path(
    delete,
    path = "/api/v1/assets",
    tag = "assets",
    params(DeleteQuery),
    responses(
        (status = 200, description = "Deletion attempted; `deleted` reports the outcome", body = DeleteResponse)
    )
)]
pub async fn delete_asset(
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> HttpResponse {
    let deleted = state.storage.delete(&query.url).await;

    HttpResponse::Ok().json(DeleteResponse {
        success: true,
        deleted,
    })
}
