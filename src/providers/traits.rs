//! Blob service trait definitions
//!
//! This module defines the contract a CDN-backed object store must follow.
//! Everything provider-specific (endpoints, signing, response shapes) stays
//! behind `BlobService` so the storage adapter never sees it.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Provider error types
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Provider-side resource class of a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Video,
    Raw,
    /// Let the provider detect the type from the payload (uploads only)
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
            ResourceType::Auto => "auto",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a single upload
///
/// The flag combination is fixed by `UploadParams::new`: the provider's
/// collision handling depends on all four together.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Desired object identifier (the asset key)
    pub public_id: String,
    pub payload: Bytes,
    /// Caller's original filename, if any
    pub filename: Option<String>,
    pub resource_type: ResourceType,
    pub overwrite: bool,
    pub use_filename: bool,
    pub unique_filename: bool,
}

impl UploadParams {
    pub fn new(public_id: impl Into<String>, payload: Bytes, filename: Option<String>) -> Self {
        UploadParams {
            public_id: public_id.into(),
            payload,
            filename,
            resource_type: ResourceType::Auto,
            overwrite: false,
            use_filename: true,
            unique_filename: true,
        }
    }
}

/// Successful upload as reported by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedBlob {
    /// HTTPS delivery URL
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Outcome of a destroy call
#[derive(Debug, Clone, Deserialize)]
pub struct DestroyOutcome {
    pub result: String,
}

impl DestroyOutcome {
    /// Only the provider's literal "ok" confirms deletion
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

/// Account usage summary. Only success matters to callers; the fields are logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageReport {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub resources: Option<u64>,
}

// ============================================================================
// Blob Service Trait
// ============================================================================

/// Remote object store used by the asset storage adapter
#[async_trait]
pub trait BlobService: Send + Sync {
    /// Provider code (e.g., "cloudinary")
    fn name(&self) -> &'static str;

    /// Store a payload under the requested public id
    async fn upload(&self, params: UploadParams) -> ProviderResult<UploadedBlob>;

    /// Delete the object stored under `public_id`
    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> ProviderResult<DestroyOutcome>;

    /// Read-only account usage query
    async fn usage(&self) -> ProviderResult<UsageReport>;
}
