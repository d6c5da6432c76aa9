// Snapshot domain model: per-sensor outcomes and per-station aggregates
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::reading::Reading;
use crate::domain::station::TimeWindow;
use crate::domain::thresholds::ClassificationLevel;

/// Why a sensor has no usable reading this cycle.
///
/// Every variant is local to one (station, sensor, window) tuple and
/// never aborts a snapshot build; the affected tile degrades to an
/// error state and self-heals on a later refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// No feed address is configured for this sensor/window.
    #[error("not configured")]
    NotConfigured,
    /// The feed address falls outside the allowed feed origin and was
    /// rejected before any request was made.
    #[error("feed address not allowed: {0}")]
    DisallowedAddress(String),
    /// The request failed before an HTTP status was received.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response from the feed host.
    #[error("HTTP {0}")]
    Http(u16),
    /// The response contained no parseable data line.
    #[error("no data")]
    NoData,
}

/// Outcome for one (station, sensor position, window) tuple.
///
/// A stale Ok reading keeps its classification for display but is
/// excluded from the station's overall severity.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorStatus {
    Ok {
        reading: Reading,
        level: ClassificationLevel,
        stale: bool,
    },
    Error(SensorError),
}

/// Everything known about one station after a build.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    pub station_id: String,
    /// Per window, sensor position to outcome.
    pub windows: BTreeMap<TimeWindow, BTreeMap<String, SensorStatus>>,
    /// Worst triggered level across Ok, non-stale statuses. `None` means
    /// "no classification" and is rendered distinctly from the levels
    /// (gray on the map).
    pub overall: Option<ClassificationLevel>,
}

impl StationSnapshot {
    pub fn new(
        station_id: impl Into<String>,
        windows: BTreeMap<TimeWindow, BTreeMap<String, SensorStatus>>,
    ) -> Self {
        let overall = derive_overall(&windows);
        Self {
            station_id: station_id.into(),
            windows,
            overall,
        }
    }
}

fn derive_overall(
    windows: &BTreeMap<TimeWindow, BTreeMap<String, SensorStatus>>,
) -> Option<ClassificationLevel> {
    windows
        .values()
        .flat_map(|sensors| sensors.values())
        .filter_map(|status| match status {
            SensorStatus::Ok {
                level,
                stale: false,
                ..
            } => level.severity().map(|rank| (rank, *level)),
            _ => None,
        })
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, level)| level)
}

/// One complete, immutable build across every configured station.
///
/// A refresh always produces a brand-new Snapshot; nothing mutates a
/// published one, so consumers never observe a partially updated view.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub refreshed_at: DateTime<Utc>,
    pub stations: BTreeMap<String, StationSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(level: ClassificationLevel, stale: bool) -> SensorStatus {
        SensorStatus::Ok {
            reading: Reading::new("2025-01-02T00:00:00.000Z", 3.6),
            level,
            stale,
        }
    }

    fn snapshot_of(statuses: Vec<(TimeWindow, &str, SensorStatus)>) -> StationSnapshot {
        let mut windows: BTreeMap<TimeWindow, BTreeMap<String, SensorStatus>> = BTreeMap::new();
        for (window, sensor, status) in statuses {
            windows
                .entry(window)
                .or_default()
                .insert(sensor.to_string(), status);
        }
        StationSnapshot::new("seagrass", windows)
    }

    #[test]
    fn test_overall_is_worst_level_across_windows_and_sensors() {
        let snapshot = snapshot_of(vec![
            (TimeWindow::Short6d, "top", ok(ClassificationLevel::Green, false)),
            (TimeWindow::Short6d, "bottom", ok(ClassificationLevel::Red, false)),
            (TimeWindow::Long15d, "top", ok(ClassificationLevel::Amber, false)),
        ]);
        assert_eq!(snapshot.overall, Some(ClassificationLevel::Red));
    }

    #[test]
    fn test_stale_statuses_do_not_drive_overall() {
        let snapshot = snapshot_of(vec![
            (TimeWindow::Short6d, "top", ok(ClassificationLevel::Red, true)),
            (TimeWindow::Long15d, "top", ok(ClassificationLevel::Amber, false)),
        ]);
        assert_eq!(snapshot.overall, Some(ClassificationLevel::Amber));
    }

    #[test]
    fn test_neutral_statuses_do_not_drive_overall() {
        let snapshot = snapshot_of(vec![(
            TimeWindow::Short6d,
            "top",
            ok(ClassificationLevel::Neutral, false),
        )]);
        assert_eq!(snapshot.overall, None);
    }

    #[test]
    fn test_all_errors_yield_no_classification() {
        let snapshot = snapshot_of(vec![
            (
                TimeWindow::Short6d,
                "top",
                SensorStatus::Error(SensorError::Http(500)),
            ),
            (
                TimeWindow::Long15d,
                "top",
                SensorStatus::Error(SensorError::NoData),
            ),
        ]);
        assert_eq!(snapshot.overall, None);
    }

    #[test]
    fn test_sensor_error_messages() {
        assert_eq!(SensorError::Http(503).to_string(), "HTTP 503");
        assert_eq!(SensorError::NoData.to_string(), "no data");
        assert_eq!(SensorError::NotConfigured.to_string(), "not configured");
    }
}
