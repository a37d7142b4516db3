// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use couples_admin::api::{self, AppState};
use couples_admin::config::Config;
use couples_admin::db::init_database;
use couples_admin::metrics::init_metrics;
use couples_admin::upload::CloudinaryHost;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,couples_admin=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::init()?;
    info!("Initialized configuration");

    init_metrics()?;

    // Initialize database
    let db = Arc::new(init_database(&config.database).await?);
    info!("Connected to database");

    let images = Arc::new(CloudinaryHost::new(config.images.clone()));
    let state = AppState::new(db, Arc::new(config.clone()), images);

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    };

    if let Err(e) = api::start_api_server(state, shutdown).await {
        error!("API server error: {}", e);
        return Err(e);
    }

    info!("Couples admin shutdown complete");
    Ok(())
}
