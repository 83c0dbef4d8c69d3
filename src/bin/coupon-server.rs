// ABOUTME: Server binary for the coupon service
// ABOUTME: Loads configuration, gates on store readiness, and serves the HTTP API
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Coupon Service Server Binary
//!
//! Starts the coupon HTTP API. Configuration comes from environment
//! variables; the store connection is established (and its indexes created)
//! before the listener binds, so no request is served until the document
//! store is ready.

use anyhow::Result;
use axum::Router;
use clap::Parser;
use coupon_service::{
    config::environment::ServerConfig,
    logging,
    middleware::setup_cors,
    resources::ServerResources,
    routes::{CouponRoutes, HealthRoutes},
    store,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "coupon-server")]
#[command(about = "Coupon service - CRUD and redemption over a document store")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting coupon service");
    info!("{}", config.summary());

    // Readiness gate: no request is served until the store connection
    // succeeds and the code uniqueness index exists.
    let store = store::connect(&config.database).await?;

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(store, config.clone()));

    let app = Router::new()
        .merge(CouponRoutes::routes(resources.clone()))
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(&config));

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown signal handler: {error}");
        return;
    }
    info!("Shutdown signal received");
}
