// Regulatory threshold table and classification levels
use std::collections::HashMap;

use crate::domain::station::TimeWindow;

/// Severity of a classified reading.
///
/// Green < Amber < Red for worst-case aggregation. Neutral means no
/// thresholds apply to the station and takes no part in worst-case
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationLevel {
    Green,
    Amber,
    Red,
    Neutral,
}

impl ClassificationLevel {
    /// Rank used for worst-case aggregation. Neutral has no rank and is
    /// skipped by aggregation entirely.
    pub fn severity(self) -> Option<u8> {
        match self {
            ClassificationLevel::Green => Some(0),
            ClassificationLevel::Amber => Some(1),
            ClassificationLevel::Red => Some(2),
            ClassificationLevel::Neutral => None,
        }
    }
}

/// Amber/red cut-offs for one site and window, in FNU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    pub amber: f64,
    pub red: f64,
}

/// Regulatory triggers keyed by site id and window.
///
/// Only the regulated sites carry entries; every other station always
/// classifies Neutral regardless of value. Lookups are case-insensitive
/// because site ids have appeared with mixed casing in older directory
/// dumps.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    sites: HashMap<String, HashMap<TimeWindow, ThresholdPair>>,
}

impl ThresholdTable {
    pub fn new(sites: HashMap<String, HashMap<TimeWindow, ThresholdPair>>) -> Self {
        let sites = sites
            .into_iter()
            .map(|(site, windows)| (site.to_lowercase(), windows))
            .collect();
        Self { sites }
    }

    /// Classify a value against the triggers for one site and window.
    ///
    /// The amber/red pair is reordered before comparison to survive a
    /// misconfigured table; a non-finite pair (or value) classifies
    /// Neutral so nothing is ever compared against NaN.
    pub fn classify(&self, station_id: &str, window: TimeWindow, value: f64) -> ClassificationLevel {
        let pair = match self
            .sites
            .get(&station_id.to_lowercase())
            .and_then(|windows| windows.get(&window))
        {
            Some(pair) => pair,
            None => return ClassificationLevel::Neutral,
        };

        if !pair.amber.is_finite() || !pair.red.is_finite() || !value.is_finite() {
            return ClassificationLevel::Neutral;
        }

        let amber = pair.amber.min(pair.red);
        let red = pair.amber.max(pair.red);

        if value >= red {
            ClassificationLevel::Red
        } else if value >= amber {
            ClassificationLevel::Amber
        } else {
            ClassificationLevel::Green
        }
    }
}
