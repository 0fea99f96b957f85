//! Cloudinary API client implementation
//!
//! Implements the `BlobService` trait over the Cloudinary REST endpoints.
//!
//! API Docs: https://cloudinary.com/documentation/image_upload_api_reference

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use super::models::CloudinaryErrorBody;
use super::signature::{self, SIGNATURE_ALGORITHM};
use crate::config::CloudinarySettings;
use crate::providers::http_client::RateLimitedClient;
use crate::providers::traits::{
    BlobService, DestroyOutcome, ProviderError, ProviderResult, ResourceType, UploadParams,
    UploadedBlob, UsageReport,
};

/// Part name used when the caller gave no original filename
const DEFAULT_FILENAME: &str = "asset";

/// Cloudinary API client
pub struct CloudinaryProvider {
    /// Rate-limited HTTP client
    client: RateLimitedClient,

    cloud_name: String,
    api_key: String,
    api_secret: String,

    /// API base URL
    base_url: String,
}

impl CloudinaryProvider {
    /// Create a provider from settings; fails if credentials are missing
    pub fn new(settings: &CloudinarySettings) -> ProviderResult<Self> {
        if !settings.is_configured() {
            return Err(ProviderError::NotConfigured(
                "cloud_name, api_key and api_secret are required".to_string(),
            ));
        }

        let client = RateLimitedClient::new(
            settings.rate_limit_per_minute,
            settings.timeout(),
            settings.connect_timeout(),
        )?;

        debug!(
            cloud_name = %settings.cloud_name,
            rate_limit_per_minute = client.rate_limit_per_minute(),
            timeout_secs = client.timeout().as_secs(),
            "Cloudinary client ready"
        );

        Ok(CloudinaryProvider {
            client,
            cloud_name: settings.cloud_name.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.base_url, self.cloud_name, resource_type, action
        )
    }

    /// Add timestamp, api_key and signature to a parameter set
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = signature::sign(&params, &self.api_secret);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params.insert("signature_algorithm", SIGNATURE_ALGORITHM.to_string());
        params
    }

    /// Turn a response into `T`, mapping error statuses to provider errors
    async fn parse<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.client.classify(e))?;

        if !status.is_success() {
            let message = CloudinaryErrorBody::message_from(&text);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthFailed(message),
                code => ProviderError::ApiError { status: code, message },
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ProviderError::ParseError(format!(
                "JSON parse error: {} - Body: {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl BlobService for CloudinaryProvider {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    #[instrument(skip(self, params), fields(public_id = %params.public_id, size = params.payload.len()))]
    async fn upload(&self, params: UploadParams) -> ProviderResult<UploadedBlob> {
        let mut fields = BTreeMap::new();
        fields.insert("public_id", params.public_id.clone());
        fields.insert("overwrite", params.overwrite.to_string());
        fields.insert("use_filename", params.use_filename.to_string());
        fields.insert("unique_filename", params.unique_filename.to_string());
        let fields = self.signed(fields);

        let filename = params
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        let length = params.payload.len() as u64;
        let file = Part::stream_with_length(params.payload, length).file_name(filename);
        let mut form = Form::new().part("file", file);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let url = self.endpoint(params.resource_type, "upload");
        debug!(url = %url, "Cloudinary upload request");

        let response = self.client.post(&url).multipart(form).send().await?;
        let blob: UploadedBlob = self.parse(response).await?;

        info!(
            secure_url = %blob.secure_url,
            public_id = ?blob.public_id,
            version = ?blob.version,
            bytes = ?blob.bytes,
            format = ?blob.format,
            "Cloudinary upload complete"
        );
        Ok(blob)
    }

    #[instrument(skip(self))]
    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> ProviderResult<DestroyOutcome> {
        let mut fields = BTreeMap::new();
        fields.insert("public_id", public_id.to_string());
        let fields = self.signed(fields);

        let url = self.endpoint(resource_type, "destroy");
        debug!(url = %url, "Cloudinary destroy request");

        let response = self.client.post(&url).form(&fields).send().await?;
        self.parse(response).await
    }

    #[instrument(skip(self))]
    async fn usage(&self) -> ProviderResult<UsageReport> {
        let url = format!("{}/v1_1/{}/usage", self.base_url, self.cloud_name);
        debug!(url = %url, "Cloudinary usage request");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, &self.api_secret)
            .send()
            .await?;
        self.parse(response).await
    }
}
