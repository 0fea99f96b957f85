//! Asset Storage
//!
//! Product image storage service using Rust + Actix-Web.
//! Uploads go to a CDN-backed blob service under random keys; deletes recover
//! the key from the delivery URL alone, so no local mapping table exists.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

mod api;
mod config;
mod providers;
mod storage;

use crate::config::Settings;
use crate::providers::ProviderFactory;
use crate::storage::AssetStorage;

/// Application state shared across all handlers
pub struct AppState {
    pub storage: AssetStorage,
}

#[cfg(test)]
impl AppState {
    /// State over an arbitrary blob service, with asset URLs on `blobcdn.example`
    pub fn for_tests(blob: std::sync::Arc<dyn providers::BlobService>) -> Self {
        let mut settings = Settings::default();
        settings.storage.delivery_domain = "blobcdn.example".to_string();
        AppState {
            storage: AssetStorage::new(blob, &settings.storage),
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("asset_storage=info".parse()?)
                .add_directive("actix_web=info".parse()?)
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting Asset Storage v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    let blob = ProviderFactory::cloudinary(&settings.cloudinary)
        .context("Failed to initialize blob service client")?;
    let storage = AssetStorage::new(blob, &settings.storage);

    // Verify credentials/connectivity once; a failure is reported, not fatal
    if storage.health_check().await {
        info!(provider = storage.provider(), "Blob service check passed");
    } else {
        warn!(provider = storage.provider(), "Blob service check failed, continuing startup");
    }

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);
    let max_upload_bytes = settings.server.max_upload_bytes;

    let app_state = web::Data::new(AppState { storage });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "asset-storage"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
