//! Application state shared by all handlers.

use crate::services::IngestionService;
use labtrack_db::ShipmentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub shipments: Arc<dyn ShipmentStore>,
    pub ingestion: IngestionService,
}
