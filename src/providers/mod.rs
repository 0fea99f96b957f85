//! Blob service integration module
//!
//! The storage adapter talks to a CDN-backed object store through the
//! `BlobService` trait. Swapping providers means adding a module here and
//! changing `ProviderFactory`; callers of the adapter never change.
//!
//! ```text
//!        ┌──────────────┐
//!        │ AssetStorage │
//!        └──────┬───────┘
//!               │
//!     ┌─────────┴─────────┐
//!     │ BlobService Trait │
//!     └─────────┬─────────┘
//!               │
//!       ┌───────┴───────┐
//!       │  Cloudinary   │
//!       └───────────────┘
//! ```

pub mod traits;
pub mod http_client;
pub mod cloudinary;
#[cfg(test)]
pub mod mock;

use std::sync::Arc;

use crate::config::CloudinarySettings;

// Re-export commonly used types
pub use traits::{BlobService, ProviderError, ProviderResult, ResourceType, UploadParams};

/// Builds the configured blob service
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn cloudinary(settings: &CloudinarySettings) -> ProviderResult<Arc<dyn BlobService>> {
        let provider = cloudinary::CloudinaryProvider::new(settings)?;
        Ok(Arc::new(provider))
    }
}
