//! In-memory fakes shared by the workflow and handler tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use labtrack_carrier::{Lookup, TrackingProvider};
use labtrack_core::models::{NewShipment, Shipment, DEFAULT_STATUS, DELIVERED_STATUS};
use labtrack_core::AppError;
use labtrack_db::ShipmentStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::services::IngestionService;
use crate::state::AppState;

pub struct MemoryStore {
    rows: Mutex<Vec<Shipment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn seeded(tracking_number: &str) -> Self {
        let store = Self::new();
        store.seed_at(tracking_number, Utc::now());
        store
    }

    /// Insert a row directly with a chosen creation time; returns its id.
    pub fn seed_at(&self, tracking_number: &str, date_created: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Shipment {
            id,
            tracking_number: tracking_number.to_string(),
            carrier: "FedEx".to_string(),
            status: Some(DEFAULT_STATUS.to_string()),
            sample_type: None,
            priority: None,
            expected_delivery_date: None,
            date_created,
            date_received: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<Shipment> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }
}

#[async_trait]
impl ShipmentStore for MemoryStore {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.tracking_number == new.tracking_number) {
            return Err(AppError::Conflict(
                "Tracking number already exists".to_string(),
            ));
        }
        let shipment = Shipment {
            id: Uuid::new_v4(),
            tracking_number: new.tracking_number,
            carrier: new.carrier.to_string(),
            status: new.status,
            sample_type: new.sample_type,
            priority: new.priority.map(|p| p.to_string()),
            expected_delivery_date: new.expected_delivery_date,
            date_created: Utc::now(),
            date_received: None,
        };
        rows.push(shipment.clone());
        Ok(shipment)
    }

    async fn list_all(&self) -> Result<Vec<Shipment>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(rows)
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.tracking_number == tracking_number)
            .cloned())
    }

    async fn mark_received(
        &self,
        id: Uuid,
        received_at: DateTime<Utc>,
    ) -> Result<Shipment, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let shipment = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Shipment not found".to_string()))?;
        shipment.date_received = Some(received_at);
        shipment.status = Some(DELIVERED_STATUS.to_string());
        Ok(shipment.clone())
    }
}

pub struct StubCarrier {
    status: Lookup<String>,
    delivery: Lookup<DateTime<Tz>>,
    fail_auth: bool,
    calls: AtomicUsize,
}

impl StubCarrier {
    pub fn new(status: Lookup<String>, delivery: Lookup<DateTime<Tz>>) -> Self {
        Self {
            status,
            delivery,
            fail_auth: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn auth_failure() -> Self {
        Self {
            status: Lookup::Unavailable,
            delivery: Lookup::Unavailable,
            fail_auth: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(Lookup::Unavailable, Lookup::Unavailable)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackingProvider for StubCarrier {
    async fn status(&self, _tracking_number: &str) -> Result<Lookup<String>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_auth {
            return Err(AppError::CarrierAuth("token exchange failed".to_string()));
        }
        Ok(self.status.clone())
    }

    async fn expected_delivery(
        &self,
        _tracking_number: &str,
    ) -> Result<Lookup<DateTime<Tz>>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_auth {
            return Err(AppError::CarrierAuth("token exchange failed".to_string()));
        }
        Ok(self.delivery.clone())
    }
}

/// AppState backed by the in-memory store, for handler tests.
pub fn test_state(store: Arc<MemoryStore>) -> Arc<AppState> {
    let ingestion = IngestionService::new(store.clone(), Arc::new(StubCarrier::unreachable()));
    Arc::new(AppState {
        shipments: store,
        ingestion,
    })
}
