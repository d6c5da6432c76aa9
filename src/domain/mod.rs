// Domain layer - core types and classification rules
pub mod reading;
pub mod snapshot;
pub mod station;
pub mod thresholds;
