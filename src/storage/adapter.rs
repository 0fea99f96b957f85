//! Asset storage adapter
//!
//! The only component callers use to put product images into, and take them
//! out of, the blob service. It keeps no record of what it stored: the key
//! lives in memory for one request and is recovered from the URL later.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::error::StorageError;
use super::key::{extract_asset_key, is_provider_url, resource_type_of, AssetKey};
use crate::config::StorageSettings;
use crate::providers::{BlobService, UploadParams};

/// Upload/delete/health facade over a `BlobService`
#[derive(Clone)]
pub struct AssetStorage {
    blob: Arc<dyn BlobService>,
    root_namespace: String,
    delivery_domain: String,
}

impl AssetStorage {
    pub fn new(blob: Arc<dyn BlobService>, settings: &StorageSettings) -> Self {
        AssetStorage {
            blob,
            root_namespace: settings.root_namespace.trim_matches('/').to_string(),
            delivery_domain: settings.delivery_domain.clone(),
        }
    }

    /// Name of the backing provider
    pub fn provider(&self) -> &'static str {
        self.blob.name()
    }

    /// Upload `payload` into `collection` and return its HTTPS URL
    pub async fn upload(&self, payload: Bytes, collection: &str) -> Result<String, StorageError> {
        self.upload_named(payload, collection, None).await
    }

    /// Like `upload`, forwarding the caller's original filename to the provider
    #[instrument(skip(self, payload), fields(size = payload.len()))]
    pub async fn upload_named(
        &self,
        payload: Bytes,
        collection: &str,
        filename: Option<&str>,
    ) -> Result<String, StorageError> {
        if payload.is_empty() {
            return Err(StorageError::Payload("payload is empty".to_string()));
        }
        if collection.is_empty() {
            return Err(StorageError::Payload("collection is empty".to_string()));
        }

        let key = AssetKey::generate(&self.root_namespace, collection);
        info!(key = %key, filename = ?filename, "Uploading asset");

        let params = UploadParams::new(key.as_str(), payload, filename.map(String::from));
        let uploaded = self.blob.upload(params).await.map_err(|e| {
            error!(key = %key, error = %e, "Asset upload failed");
            StorageError::from(e)
        })?;

        if uploaded.secure_url.is_empty() {
            error!(key = %key, "Blob service response carried no secure_url");
            return Err(StorageError::RemoteRejection {
                status: None,
                message: "response missing secure_url".to_string(),
            });
        }

        info!(key = %key, url = %uploaded.secure_url, "Asset uploaded");
        Ok(uploaded.secure_url)
    }

    /// Best-effort delete by URL; true only when the provider confirms it
    #[instrument(skip(self))]
    pub async fn delete(&self, url: &str) -> bool {
        let key = match self.key_for(url) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Skipping asset delete");
                return false;
            }
        };

        let resource_type = resource_type_of(url);
        debug!(key = %key, resource_type = %resource_type, "Deleting asset");

        match self.blob.destroy(key.as_str(), resource_type).await {
            Ok(outcome) => {
                info!(key = %key, result = %outcome.result, "Asset delete finished");
                outcome.is_ok()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Asset delete failed");
                false
            }
        }
    }

    /// True when a read-only usage query succeeds
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> bool {
        match self.blob.usage().await {
            Ok(usage) => {
                info!(
                    provider = self.blob.name(),
                    plan = ?usage.plan,
                    resources = ?usage.resources,
                    last_updated = ?usage.last_updated,
                    "Blob service reachable"
                );
                true
            }
            Err(e) => {
                error!(provider = self.blob.name(), error = %e, "Blob service health check failed");
                false
            }
        }
    }

    /// Provenance check plus key extraction, without touching the network
    fn key_for(&self, url: &str) -> Result<AssetKey, StorageError> {
        if !is_provider_url(url, &self.delivery_domain) {
            return Err(StorageError::MalformedUrl(format!(
                "{} is not served from {}",
                url, self.delivery_domain
            )));
        }

        extract_asset_key(url).map_err(|e| StorageError::MalformedUrl(format!("{}: {}", url, e)))
    }
}
