// Configuration loading and station schema normalization
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::station::{Station, TimeWindow};
use crate::domain::thresholds::{ThresholdPair, ThresholdTable};

/// Sensor position assumed for directory entries that predate per-depth
/// deployments and carry no sensor list.
const DEFAULT_SENSOR: &str = "top";

/// Raw station entry as it appears in stations.toml.
///
/// Two generations of the directory schema are in circulation: the
/// per-sensor feed map has been called both `data` and `values`, and
/// older entries omit the sensor list. Everything is normalized here so
/// the snapshot engine only ever sees the canonical `Station` shape.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub sensors: Option<Vec<String>>,
    /// sensor position -> feed key -> feed address
    #[serde(default, alias = "values")]
    pub data: HashMap<String, HashMap<String, String>>,
}

impl StationConfig {
    pub fn into_station(self) -> Station {
        let sensors = match self.sensors {
            Some(sensors) if !sensors.is_empty() => sensors,
            _ => vec![DEFAULT_SENSOR.to_string()],
        };
        Station::new(
            self.id,
            self.name,
            self.latitude,
            self.longitude,
            sensors,
            self.data,
        )
    }
}

/// Root structure of stations.toml.
#[derive(Debug, Deserialize)]
pub struct StationsConfig {
    pub station: Vec<StationConfig>,
}

impl StationsConfig {
    pub fn into_stations(self) -> Vec<Station> {
        self.station
            .into_iter()
            .map(StationConfig::into_station)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawThresholdPair {
    pub amber: f64,
    pub red: f64,
}

/// Root structure of thresholds.toml: site id -> window label -> pair.
#[derive(Debug, Deserialize)]
pub struct ThresholdsConfig {
    pub site: HashMap<String, HashMap<String, RawThresholdPair>>,
}

impl ThresholdsConfig {
    pub fn into_table(self) -> ThresholdTable {
        let mut sites = HashMap::new();
        for (site, windows) in self.site {
            let mut by_window = HashMap::new();
            for (label, pair) in windows {
                match TimeWindow::from_label(&label) {
                    Some(window) => {
                        by_window.insert(
                            window,
                            ThresholdPair {
                                amber: pair.amber,
                                red: pair.red,
                            },
                        );
                    }
                    None => {
                        tracing::warn!("unknown threshold window '{}' for site {}", label, site);
                    }
                }
            }
            sites.insert(site, by_window);
        }
        ThresholdTable::new(sites)
    }
}

pub fn load_stations_config() -> anyhow::Result<StationsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/stations"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_thresholds_config() -> anyhow::Result<ThresholdsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/thresholds"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
