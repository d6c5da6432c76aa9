// Application state for HTTP handlers
use std::sync::Arc;

use crate::application::snapshot_service::SnapshotService;

pub struct AppState {
    pub snapshot_service: Arc<SnapshotService>,
}
