// View DTOs - the JSON shapes consumed by the tile and map views
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::snapshot::{SensorStatus, Snapshot, StationSnapshot};
use crate::domain::station::Station;
use crate::domain::thresholds::ClassificationLevel;

/// Directory entry for map marker placement.
#[derive(Debug, Serialize)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sensors: Vec<String>,
}

pub fn station_to_view(station: &Station) -> StationView {
    StationView {
        id: station.id.clone(),
        name: station.name.clone(),
        latitude: station.latitude,
        longitude: station.longitude,
        sensors: station.sensors.clone(),
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotView {
    pub refreshed_at: String,
    pub stations: BTreeMap<String, StationSnapshotView>,
}

#[derive(Debug, Serialize)]
pub struct StationSnapshotView {
    pub id: String,
    /// Worst triggered level, or null for "no classification" (gray).
    pub overall: Option<&'static str>,
    /// window label -> sensor position -> status
    pub windows: BTreeMap<&'static str, BTreeMap<String, SensorStatusView>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SensorStatusView {
    Ok {
        value: f64,
        timestamp: String,
        level: &'static str,
        stale: bool,
    },
    Error {
        reason: String,
    },
}

pub fn snapshot_to_view(snapshot: &Snapshot) -> SnapshotView {
    SnapshotView {
        refreshed_at: snapshot.refreshed_at.to_rfc3339(),
        stations: snapshot
            .stations
            .iter()
            .map(|(id, station)| (id.clone(), station_snapshot_to_view(station)))
            .collect(),
    }
}

fn station_snapshot_to_view(station: &StationSnapshot) -> StationSnapshotView {
    let windows = station
        .windows
        .iter()
        .map(|(window, sensors)| {
            let sensors = sensors
                .iter()
                .map(|(sensor, status)| (sensor.clone(), sensor_status_to_view(status)))
                .collect();
            (window.label(), sensors)
        })
        .collect();

    StationSnapshotView {
        id: station.station_id.clone(),
        overall: station.overall.map(level_name),
        windows,
    }
}

fn sensor_status_to_view(status: &SensorStatus) -> SensorStatusView {
    match status {
        SensorStatus::Ok {
            reading,
            level,
            stale,
        } => SensorStatusView::Ok {
            value: reading.value,
            timestamp: reading.timestamp.clone(),
            level: level_name(*level),
            stale: *stale,
        },
        SensorStatus::Error(error) => SensorStatusView::Error {
            reason: error.to_string(),
        },
    }
}

fn level_name(level: ClassificationLevel) -> &'static str {
    match level {
        ClassificationLevel::Green => "green",
        ClassificationLevel::Amber => "amber",
        ClassificationLevel::Red => "red",
        ClassificationLevel::Neutral => "neutral",
    }
}
