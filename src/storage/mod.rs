//! Storage module for product assets
//!
//! Uploads product images to the configured blob service under freshly
//! generated keys and deletes them again given only their delivery URL.

mod adapter;
mod error;
mod key;

pub use adapter::AssetStorage;
pub use error::StorageError;
