//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    health::{HealthResponse, BlobServiceStatus},
    assets::{UploadQuery, DeleteQuery, UploadResponse, DeleteResponse, ErrorResponse, ApiError},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asset Storage API",
        version = "1.0.0",
        description = "Product image storage backed by a CDN blob service",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "assets", description = "Asset upload and deletion endpoints")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::assets::upload_asset,
        crate::api::handlers::assets::delete_asset,
    ),
    components(
        schemas(
            // Health schemas
            HealthResponse,
            BlobServiceStatus,
            // Asset schemas
            UploadQuery,
            DeleteQuery,
            UploadResponse,
            DeleteResponse,
            ErrorResponse,
            ApiError,
        )
    )
)]
pub struct ApiDoc;
