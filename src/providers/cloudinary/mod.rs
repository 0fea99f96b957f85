//! Cloudinary Provider Module
//!
//! Implements `BlobService` against the Cloudinary Upload and Admin APIs:
//! signed uploads, destroy-by-public-id, and the account usage report.
//!
//! API Documentation: https://cloudinary.com/documentation/image_upload_api_reference

mod client;
mod models;
mod signature;

pub use client::CloudinaryProvider;
