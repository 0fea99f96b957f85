//! Asset keys and their recovery from delivery URLs
//!
//! A key is generated once per upload as `<root>/<collection>/<uuid>`. The
//! provider echoes it back inside the delivery URL, e.g.
//!
//! ```text
//! https://res.cloudinary.com/<cloud>/image/upload/v1700000000/<root>/<collection>/<uuid>.jpg
//!                                    └─ type ─┘        └ version ┘└──────── key ────────┘ └ ext
//! ```
//!
//! and `extract_asset_key` is the only place that knows how to take it apart.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::providers::ResourceType;

/// Marker that separates delivery prefix from the stored path
const UPLOAD_MARKER: &str = "/upload/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("URL has no '/upload/' segment")]
    MissingUploadMarker,

    #[error("URL yields an empty asset key")]
    EmptyKey,
}

/// Path-style identifier of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    /// Fresh key under `root/collection` with a random v4 token
    pub fn generate(root: &str, collection: &str) -> Self {
        AssetKey(format!("{}/{}/{}", root, collection, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recover the asset key from a delivery URL
///
/// Everything after the first `/upload/` is taken, a leading `v<digits>/`
/// version stamp is dropped, then the extension after the last `.` is cut
/// unless that dot is the first character.
pub fn extract_asset_key(url: &str) -> Result<AssetKey, KeyError> {
    let (_, after_upload) = url
        .split_once(UPLOAD_MARKER)
        .ok_or(KeyError::MissingUploadMarker)?;

    if after_upload.is_empty() {
        return Err(KeyError::EmptyKey);
    }

    let path = strip_version(after_upload);

    let key = match path.rfind('.') {
        Some(dot) if dot > 0 => &path[..dot],
        _ => path,
    };

    if key.is_empty() {
        return Err(KeyError::EmptyKey);
    }

    Ok(AssetKey(key.to_string()))
}

/// Drop a leading `v<digits>/` segment, if present
fn strip_version(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('v') else {
        return path;
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && rest[digits..].starts_with('/') {
        &rest[digits + 1..]
    } else {
        path
    }
}

/// Resource type named by the path segment just before `/upload/`
pub fn resource_type_of(url: &str) -> ResourceType {
    let Some((prefix, _)) = url.split_once(UPLOAD_MARKER) else {
        return ResourceType::Image;
    };

    match prefix.rsplit('/').next() {
        Some("video") => ResourceType::Video,
        Some("raw") => ResourceType::Raw,
        _ => ResourceType::Image,
    }
}

/// True when `url` is an absolute http(s) URL served from `delivery_domain`
/// or one of its subdomains
pub fn is_provider_url(url: &str, delivery_domain: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };

    if !matches!(parsed.scheme(), "https" | "http") {
        return false;
    }

    let domain = delivery_domain.trim_start_matches('.').to_ascii_lowercase();
    match parsed.host_str() {
        Some(host) if !domain.is_empty() => {
            let host = host.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{}", domain))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSIONED: &str =
        "https://res.blobcdn.example/cloudname/image/upload/v1700000000/nishmitha-roots/products/3f9a1c2b.jpg";
    const UNVERSIONED: &str =
        "https://res.blobcdn.example/cloudname/image/upload/nishmitha-roots/products/3f9a1c2b.jpg";

    #[test]
    fn test_extract_versioned_url() {
        let key = extract_asset_key(VERSIONED).unwrap();
        assert_eq!(key.as_str(), "nishmitha-roots/products/3f9a1c2b");
    }

    #[test]
    fn test_extract_unversioned_url() {
        let key = extract_asset_key(UNVERSIONED).unwrap();
        assert_eq!(key.as_str(), "nishmitha-roots/products/3f9a1c2b");
    }

    #[test]
    fn test_round_trip_generated_keys() {
        let versions = ["", "v1/", "v1700000000/"];
        let extensions = ["jpg", "png", "webp", "tar.gz"];

        for _ in 0..20 {
            let key = AssetKey::generate("nishmitha-roots", "products");
            for version in versions {
                for ext in extensions {
                    let url = format!(
                        "https://res.cloudinary.com/demo/image/upload/{}{}.{}",
                        version, key, ext
                    );
                    let expected = if ext == "tar.gz" {
                        format!("{}.tar", key)
                    } else {
                        key.to_string()
                    };
                    assert_eq!(extract_asset_key(&url).unwrap().as_str(), expected, "{}", url);
                }
            }
        }
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            extract_asset_key("https://res.cloudinary.com/demo/image/fetch/a.jpg"),
            Err(KeyError::MissingUploadMarker)
        );
        assert_eq!(extract_asset_key(""), Err(KeyError::MissingUploadMarker));
    }

    #[test]
    fn test_empty_after_marker() {
        assert_eq!(
            extract_asset_key("https://res.cloudinary.com/demo/image/upload/"),
            Err(KeyError::EmptyKey)
        );
        assert_eq!(
            extract_asset_key("https://res.cloudinary.com/demo/image/upload/v123/"),
            Err(KeyError::EmptyKey)
        );
    }

    #[test]
    fn test_key_without_extension() {
        let key = extract_asset_key("https://res.cloudinary.com/demo/image/upload/ns/products/abc").unwrap();
        assert_eq!(key.as_str(), "ns/products/abc");
    }

    #[test]
    fn test_leading_dot_is_not_an_extension() {
        let key = extract_asset_key("https://res.cloudinary.com/demo/raw/upload/.htaccess").unwrap();
        assert_eq!(key.as_str(), ".htaccess");

        let key = extract_asset_key("https://res.cloudinary.com/demo/raw/upload/v9/.env").unwrap();
        assert_eq!(key.as_str(), ".env");
    }

    #[test]
    fn test_version_lookalikes_are_kept() {
        // no digits
        let key = extract_asset_key("https://res.cloudinary.com/demo/image/upload/v/products/a.png").unwrap();
        assert_eq!(key.as_str(), "v/products/a");

        // letters after the digits
        let key = extract_asset_key("https://res.cloudinary.com/demo/image/upload/v12a/products/a.png").unwrap();
        assert_eq!(key.as_str(), "v12a/products/a");

        // a folder that merely starts with v
        let key = extract_asset_key("https://res.cloudinary.com/demo/image/upload/vintage/a.png").unwrap();
        assert_eq!(key.as_str(), "vintage/a");
    }

    #[test]
    fn test_generate_shape_and_uniqueness() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let key = AssetKey::generate("nishmitha-roots", "products");
            let token = key.as_str().strip_prefix("nishmitha-roots/products/").unwrap();
            assert!(Uuid::parse_str(token).is_ok());
            assert!(seen.insert(key));
        }
    }

    #[test]
    fn test_resource_type_of() {
        assert_eq!(resource_type_of(VERSIONED), ResourceType::Image);
        assert_eq!(
            resource_type_of("https://res.cloudinary.com/demo/video/upload/v1/a.mp4"),
            ResourceType::Video
        );
        assert_eq!(
            resource_type_of("https://res.cloudinary.com/demo/raw/upload/a.pdf"),
            ResourceType::Raw
        );
        assert_eq!(
            resource_type_of("https://res.cloudinary.com/demo/upload/a.jpg"),
            ResourceType::Image
        );
    }

    #[test]
    fn test_is_provider_url() {
        assert!(is_provider_url(VERSIONED, "blobcdn.example"));
        assert!(is_provider_url("https://blobcdn.example/x/image/upload/a.jpg", "blobcdn.example"));
        assert!(is_provider_url("https://RES.Cloudinary.com/x/image/upload/a.jpg", "cloudinary.com"));

        assert!(!is_provider_url("https://images.example.org/a.jpg", "cloudinary.com"));
        assert!(!is_provider_url("https://notcloudinary.com/x/image/upload/a.jpg", "cloudinary.com"));
        assert!(!is_provider_url("https://cloudinary.com.evil.test/upload/a.jpg", "cloudinary.com"));
        assert!(!is_provider_url("ftp://res.cloudinary.com/x/image/upload/a.jpg", "cloudinary.com"));
        assert!(!is_provider_url("/uploads/local.jpg", "cloudinary.com"));
        assert!(!is_provider_url(VERSIONED, ""));
    }
}
