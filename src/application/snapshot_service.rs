// Snapshot service - builds and owns the published turbidity snapshot
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::application::feed_repository::FeedRepository;
use crate::domain::snapshot::{SensorError, SensorStatus, Snapshot, StationSnapshot};
use crate::domain::station::{Station, TimeWindow, PARAM_TURBIDITY};
use crate::domain::thresholds::ThresholdTable;
use crate::infrastructure::feed_parser;

/// Cadence of the periodic runner. Feeds update at most a few times a
/// day, so five minutes keeps tiles current without hammering the host.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// How feed fetches are scheduled within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Await every (station, window, sensor) fetch in order.
    Sequential,
    /// Fetch the 6-day and 15-day batches as two concurrent groups,
    /// joined before the snapshot is assembled.
    PerWindow,
}

/// Owns the snapshot engine state: the station directory, the threshold
/// table, the feed source, and the most recently published build.
///
/// Lifecycle: construct, `start` the periodic runner, `stop` it on
/// shutdown. `latest` and `refresh` are the only consumer entry points;
/// the published snapshot is replaced whole, never mutated, so readers
/// always hold an internally consistent build.
pub struct SnapshotService {
    stations: Vec<Station>,
    thresholds: ThresholdTable,
    feeds: Arc<dyn FeedRepository>,
    strategy: FetchStrategy,
    latest: RwLock<Option<Arc<Snapshot>>>,
    runner: Mutex<Option<JoinHandle<()>>>,
}

impl SnapshotService {
    pub fn new(
        stations: Vec<Station>,
        thresholds: ThresholdTable,
        feeds: Arc<dyn FeedRepository>,
        strategy: FetchStrategy,
    ) -> Self {
        Self {
            stations,
            thresholds,
            feeds,
            strategy,
            latest: RwLock::new(None),
            runner: Mutex::new(None),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Latest completed build, if any cycle has finished yet.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.read().expect("snapshot lock poisoned").clone()
    }

    /// Run one build cycle, publish the result, and return it.
    ///
    /// A build always completes: per-sensor failures are recorded in the
    /// snapshot, never propagated. Nothing is retried within a cycle.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let snapshot = Arc::new(self.build(Utc::now()).await);
        *self.latest.write().expect("snapshot lock poisoned") = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Start the periodic runner. The first build begins immediately;
    /// calling `start` again replaces any previous runner.
    pub fn start(self: Arc<Self>, every: Duration) {
        let service = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let snapshot = service.refresh().await;
                tracing::info!(
                    "snapshot refreshed: {} stations at {}",
                    snapshot.stations.len(),
                    snapshot.refreshed_at
                );
            }
        });

        let mut runner = self.runner.lock().expect("runner lock poisoned");
        if let Some(previous) = runner.replace(handle) {
            previous.abort();
        }
    }

    /// Stop the periodic runner. The latest published snapshot stays
    /// readable; an in-flight build is abandoned.
    pub fn stop(&self) {
        if let Some(handle) = self.runner.lock().expect("runner lock poisoned").take() {
            handle.abort();
        }
    }

    async fn build(&self, now: DateTime<Utc>) -> Snapshot {
        let statuses = match self.strategy {
            FetchStrategy::Sequential => self.poll_sequential(now).await,
            FetchStrategy::PerWindow => self.poll_per_window(now).await,
        };
        self.assemble(now, statuses)
    }

    async fn poll_sequential(&self, now: DateTime<Utc>) -> Vec<PolledStatus> {
        let mut statuses = Vec::new();
        for window in TimeWindow::ALL {
            statuses.extend(self.poll_window(window, now).await);
        }
        statuses
    }

    async fn poll_per_window(&self, now: DateTime<Utc>) -> Vec<PolledStatus> {
        let (short, long) = futures::join!(
            self.poll_window(TimeWindow::Short6d, now),
            self.poll_window(TimeWindow::Long15d, now),
        );
        short.into_iter().chain(long).collect()
    }

    async fn poll_window(&self, window: TimeWindow, now: DateTime<Utc>) -> Vec<PolledStatus> {
        let mut statuses = Vec::new();
        for station in &self.stations {
            for sensor in &station.sensors {
                let status = self.poll_sensor(station, sensor, window, now).await;
                statuses.push(PolledStatus {
                    station_id: station.id.clone(),
                    window,
                    sensor: sensor.clone(),
                    status,
                });
            }
        }
        statuses
    }

    async fn poll_sensor(
        &self,
        station: &Station,
        sensor: &str,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> SensorStatus {
        let url = match station.feed_url(sensor, PARAM_TURBIDITY, window) {
            Some(url) => url.to_string(),
            None => return SensorStatus::Error(SensorError::NotConfigured),
        };

        let body = match self.feeds.fetch_feed(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    "feed fetch failed for {}/{}/{}: {}",
                    station.id,
                    sensor,
                    window.label(),
                    e
                );
                return SensorStatus::Error(e);
            }
        };

        let reading = match feed_parser::latest_reading(&body) {
            Some(reading) => reading,
            None => return SensorStatus::Error(SensorError::NoData),
        };

        let stale = reading.is_stale_at(now);
        // Classify with the window the feed belongs to; the same value
        // can sit on different sides of the two windows' triggers.
        let level = self.thresholds.classify(&station.id, window, reading.value);
        SensorStatus::Ok {
            reading,
            level,
            stale,
        }
    }

    fn assemble(&self, now: DateTime<Utc>, statuses: Vec<PolledStatus>) -> Snapshot {
        let mut per_station: BTreeMap<String, BTreeMap<TimeWindow, BTreeMap<String, SensorStatus>>> =
            BTreeMap::new();

        // Seed every configured station so each appears in the snapshot
        // even when all of its sensors errored.
        for station in &self.stations {
            per_station.insert(station.id.clone(), BTreeMap::new());
        }

        for polled in statuses {
            per_station
                .entry(polled.station_id)
                .or_default()
                .entry(polled.window)
                .or_default()
                .insert(polled.sensor, polled.status);
        }

        let stations = per_station
            .into_iter()
            .map(|(id, windows)| (id.clone(), StationSnapshot::new(id, windows)))
            .collect();

        Snapshot {
            refreshed_at: now,
            stations,
        }
    }
}

struct PolledStatus {
    station_id: String,
    window: TimeWindow,
    sensor: String,
    status: SensorStatus,
}
