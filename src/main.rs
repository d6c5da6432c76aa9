// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};

use crate::application::snapshot_service::{
    FetchStrategy, SnapshotService, DEFAULT_REFRESH_INTERVAL,
};
use crate::infrastructure::config::{load_stations_config, load_thresholds_config};
use crate::infrastructure::http_feed_repository::HttpFeedRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_snapshot, health_check, list_stations, trigger_refresh};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration. This is the one fatal failure path: without a
    // station directory there is nothing to poll.
    let stations = load_stations_config()
        .context("failed to load station configuration")?
        .into_stations();
    let thresholds = load_thresholds_config()
        .context("failed to load threshold configuration")?
        .into_table();

    // Create repository (infrastructure layer)
    let feeds = Arc::new(HttpFeedRepository::new());

    // Create the snapshot engine (application layer) and begin polling
    let snapshot_service = Arc::new(SnapshotService::new(
        stations,
        thresholds,
        feeds,
        FetchStrategy::PerWindow,
    ));
    Arc::clone(&snapshot_service).start(DEFAULT_REFRESH_INTERVAL);

    // Create application state
    let state = Arc::new(AppState { snapshot_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/stations", get(list_stations))
        .route("/snapshot", get(get_snapshot))
        .route("/refresh", post(trigger_refresh))
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("Starting turbidity-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
