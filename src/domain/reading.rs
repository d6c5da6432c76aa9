// Latest-reading domain model and freshness checking
use chrono::{DateTime, Duration, Utc};

/// Readings older than this are flagged stale on the dashboard.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// The most recent sample parsed from one feed.
///
/// The timestamp is kept as the raw feed text: it is displayed verbatim
/// and only parsed when checking freshness, so a malformed timestamp
/// never turns into a parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: String,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }

    /// Parse the raw timestamp as an RFC 3339 instant.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the reading is older than the freshness window at `now`.
    ///
    /// The boundary is exclusive: a reading exactly 24 hours old is still
    /// fresh. An unparseable timestamp is reported stale so that
    /// uncertain data is flagged rather than hidden.
    ///
    /// `now` is injected rather than read from the clock, which keeps
    /// staleness deterministic in tests.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        match self.instant() {
            Some(instant) => now - instant > Duration::hours(FRESHNESS_WINDOW_HOURS),
            None => true,
        }
    }
}
