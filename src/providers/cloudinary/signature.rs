//! Cloudinary request signing
//!
//! Signed parameters are sorted by name, joined as `k=v&k=v`, the API secret
//! is appended, and the result is hashed. We always sign with SHA-256 and send
//! `signature_algorithm=sha256` alongside.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Parameters that are sent but never signed
const UNSIGNED: &[&str] = &[
    "file",
    "api_key",
    "resource_type",
    "cloud_name",
    "signature",
    "signature_algorithm",
];

pub const SIGNATURE_ALGORITHM: &str = "sha256";

/// Hex SHA-256 signature over the signable subset of `params`
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(name, value)| !UNSIGNED.contains(*name) && !value.is_empty())
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
