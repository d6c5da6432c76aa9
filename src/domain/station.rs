// Station domain model and feed address resolution
use std::collections::HashMap;

/// Parameter key for turbidity feeds (values are in FNU).
pub const PARAM_TURBIDITY: &str = "turbidity";

/// Statistical window a feed represents (rolling median period).
/// Regulatory thresholds are defined per window, so a reading must
/// always be classified with the window of the feed it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeWindow {
    Short6d,
    Long15d,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 2] = [TimeWindow::Short6d, TimeWindow::Long15d];

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Short6d => "6d",
            TimeWindow::Long15d => "15d",
        }
    }

    pub fn from_label(label: &str) -> Option<TimeWindow> {
        match label {
            "6d" => Some(TimeWindow::Short6d),
            "15d" => Some(TimeWindow::Long15d),
            _ => None,
        }
    }
}

/// One monitored station from the directory.
///
/// Sensor positions are deployment depth labels ("top"/"bottom"). Each
/// sensor carries its own map from feed key to feed address; several
/// generations of key naming are in circulation, so addresses are looked
/// up through `feed_url` rather than by key directly.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sensors: Vec<String>,
    feeds: HashMap<String, HashMap<String, String>>,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        sensors: Vec<String>,
        feeds: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        Self {
            id: id.into().to_lowercase(),
            name: name.into(),
            latitude,
            longitude,
            sensors,
            feeds,
        }
    }

    /// Resolve the feed address for a sensor/parameter/window pair.
    ///
    /// Key variants are tried most-specific first. The windowless legacy
    /// key always meant the 15-day statistic, so only the long window
    /// falls back to it. `None` means the feed is not configured, which
    /// is a valid state, not an error.
    pub fn feed_url(&self, sensor: &str, parameter: &str, window: TimeWindow) -> Option<&str> {
        let keys = self.feeds.get(sensor)?;
        for candidate in feed_key_candidates(parameter, window) {
            if let Some(url) = keys.get(candidate.as_str()) {
                return Some(url.as_str());
            }
        }
        None
    }
}

/// Ordered alias candidates for one (parameter, window) pair.
fn feed_key_candidates(parameter: &str, window: TimeWindow) -> Vec<String> {
    match window {
        TimeWindow::Short6d => vec![
            format!("{}_6d", parameter),
            format!("{}6d", parameter),
        ],
        TimeWindow::Long15d => vec![
            format!("{}_15d", parameter),
            format!("{}15d", parameter),
            parameter.to_string(),
        ],
    }
}
