//! Cloudinary API response models

use serde::Deserialize;

/// Error envelope returned by both the Upload and Admin APIs
#[derive(Debug, Deserialize)]
pub struct CloudinaryErrorBody {
    pub error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct CloudinaryErrorDetail {
    pub message: String,
}

impl CloudinaryErrorBody {
    /// Best-effort extraction of the service message from a raw error body
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<CloudinaryErrorBody>(body)
            .map(|parsed| parsed.error.message)
            .unwrap_or_else(|_| body.chars().take(500).collect())
    }
}
