//! Application initialization.

pub mod database;
pub mod routes;
pub mod server;

use crate::services::IngestionService;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use labtrack_carrier::{FedExClient, TokenCache};
use labtrack_core::AppConfig;
use labtrack_db::{ShipmentRepository, ShipmentStore};
use std::sync::Arc;

/// Wire up the database pool, repositories, carrier client, and routes.
pub async fn initialize_app(config: AppConfig) -> Result<(Arc<AppState>, Router)> {
    let pool = database::setup_database(&config).await?;

    let shipments: Arc<dyn ShipmentStore> = Arc::new(ShipmentRepository::new(pool));

    // One token cache per process, injected into the carrier client
    let tokens = Arc::new(TokenCache::new());
    let fedex = FedExClient::new(config.fedex.clone(), tokens)?;

    let ingestion = IngestionService::new(shipments.clone(), Arc::new(fedex));

    let state = Arc::new(AppState {
        shipments,
        ingestion,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
