// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::views::{snapshot_to_view, station_to_view, StationView};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Station directory, used by the map view for marker placement
pub async fn list_stations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stations: Vec<StationView> = state
        .snapshot_service
        .stations()
        .iter()
        .map(station_to_view)
        .collect();
    Json(stations)
}

/// Latest completed snapshot; unavailable until the first build finishes
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.snapshot_service.latest() {
        Some(snapshot) => Json(snapshot_to_view(&snapshot)).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "no snapshot built yet").into_response(),
    }
}

/// Trigger one build cycle and return the fresh snapshot
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot_service.refresh().await;
    Json(snapshot_to_view(&snapshot))
}
