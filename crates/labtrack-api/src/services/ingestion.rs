//! Shipment ingestion workflow.
//!
//! Ordering is fixed: input validation first, then the duplicate fast path,
//! then (for FedEx only) carrier enrichment, then the insert. No network or
//! database work happens before validation, and no carrier call happens for a
//! known-duplicate tracking number.
//!
//! Carrier enrichment is best effort: an unreachable or misconfigured carrier
//! must never block sample intake. Only a definitive "tracking number not
//! recognized" answer changes the outcome, by persisting the shipment with a
//! NULL status instead of the default.

use chrono::DateTime;
use chrono_tz::Tz;
use labtrack_carrier::{format_delivery_date, Lookup, TrackingProvider};
use labtrack_core::models::{
    CarrierKind, CreateShipmentRequest, NewShipment, Priority, Shipment, DEFAULT_STATUS,
};
use labtrack_core::{validate_tracking_number, AppError};
use labtrack_db::ShipmentStore;
use std::sync::Arc;

/// Orchestrates creation of a shipment record from untrusted input.
#[derive(Clone)]
pub struct IngestionService {
    store: Arc<dyn ShipmentStore>,
    carrier: Arc<dyn TrackingProvider>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn ShipmentStore>, carrier: Arc<dyn TrackingProvider>) -> Self {
        Self { store, carrier }
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn create_shipment(
        &self,
        request: CreateShipmentRequest,
    ) -> Result<Shipment, AppError> {
        let tracking_number = validate_tracking_number(request.tracking_number.as_deref())?;

        let carrier: CarrierKind = request.carrier.parse().map_err(|_| {
            AppError::Validation("Carrier must be one of FedEx, UPS, DHL".to_string())
        })?;

        let priority: Option<Priority> = match request.priority.as_deref() {
            None | Some("") => None,
            Some(value) => Some(value.parse().map_err(|_| {
                AppError::Validation("Priority must be one of Low, Medium, High".to_string())
            })?),
        };

        // Fast-path duplicate check. The unique index on the table closes the
        // race window between this read and the insert below.
        if self
            .store
            .find_by_tracking_number(&tracking_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Tracking number already exists".to_string(),
            ));
        }

        let mut status = Some(DEFAULT_STATUS.to_string());
        let mut expected_delivery_date = None;

        if carrier == CarrierKind::FedEx {
            status = resolve_status(self.carrier.status(&tracking_number).await);
            expected_delivery_date =
                resolve_delivery_date(self.carrier.expected_delivery(&tracking_number).await);
        }

        let shipment = self
            .store
            .insert(NewShipment {
                tracking_number,
                carrier,
                status,
                sample_type: request.sample_type,
                priority,
                expected_delivery_date,
            })
            .await?;

        tracing::info!(
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number,
            carrier = %shipment.carrier,
            "Shipment created"
        );

        Ok(shipment)
    }
}

/// Status policy for FedEx shipments. A recognized tracking number adopts the
/// carrier's description; an unrecognized one persists with no status; any
/// failure keeps the default.
fn resolve_status(lookup: Result<Lookup<String>, AppError>) -> Option<String> {
    match lookup {
        Ok(Lookup::Found(description)) => Some(description),
        Ok(Lookup::NotFound) => None,
        Ok(Lookup::Unavailable) => {
            tracing::warn!("Carrier unavailable for status lookup, using default status");
            Some(DEFAULT_STATUS.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Carrier status enrichment failed, using default status");
            Some(DEFAULT_STATUS.to_string())
        }
    }
}

/// Delivery-date policy: stored only when the carrier produced one; formatted
/// and truncated before it ever reaches the store.
fn resolve_delivery_date(lookup: Result<Lookup<DateTime<Tz>>, AppError>) -> Option<String> {
    match lookup {
        Ok(Lookup::Found(delivered_at)) => Some(format_delivery_date(delivered_at)),
        Ok(Lookup::NotFound) | Ok(Lookup::Unavailable) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Carrier delivery-date enrichment failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, StubCarrier};
    use chrono::DateTime as ChronoDateTime;
    use labtrack_carrier::MAX_DELIVERY_DATE_LEN;

    fn request(tracking_number: &str, carrier: &str) -> CreateShipmentRequest {
        CreateShipmentRequest {
            tracking_number: Some(tracking_number.to_string()),
            carrier: carrier.to_string(),
            sample_type: Some("Blood".to_string()),
            priority: Some("High".to_string()),
        }
    }

    fn service(store: Arc<MemoryStore>, carrier: Arc<StubCarrier>) -> IngestionService {
        IngestionService::new(store, carrier)
    }

    fn la_time(rfc3339_utc: &str) -> DateTime<Tz> {
        ChronoDateTime::parse_from_rfc3339(rfc3339_utc)
            .unwrap()
            .with_timezone(&chrono_tz::America::Los_Angeles)
    }

    #[tokio::test]
    async fn test_short_tracking_number_rejected_before_any_work() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::unreachable());
        let svc = service(store.clone(), carrier.clone());

        let err = svc
            .create_shipment(request("12345", "FedEx"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
        assert_eq!(carrier.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_tracking_number_rejected() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::unreachable());
        let svc = service(store.clone(), carrier);

        let err = svc
            .create_shipment(CreateShipmentRequest {
                tracking_number: None,
                carrier: "FedEx".to_string(),
                sample_type: None,
                priority: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_without_carrier_call() {
        let store = Arc::new(MemoryStore::seeded("794687123456"));
        let carrier = Arc::new(StubCarrier::unreachable());
        let svc = service(store.clone(), carrier.clone());

        let err = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(carrier.calls(), 0);
    }

    #[tokio::test]
    async fn test_fedex_enrichment_adopts_carrier_status_and_date() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::new(
            Lookup::Found("Delivered to recipient".to_string()),
            Lookup::Found(la_time("2024-03-01T18:00:00Z")),
        ));
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap();

        assert_eq!(shipment.status.as_deref(), Some("Delivered to recipient"));
        assert_eq!(
            shipment.expected_delivery_date.as_deref(),
            Some("2024-03-01T10:00:00-08:00")
        );
        assert_eq!(shipment.priority.as_deref(), Some("High"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_tracking_number_persists_with_null_status() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::new(Lookup::NotFound, Lookup::NotFound));
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap();

        assert_eq!(shipment.status, None);
        assert_eq!(shipment.expected_delivery_date, None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_carrier_outage_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::unreachable());
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap();

        assert_eq!(shipment.status.as_deref(), Some(DEFAULT_STATUS));
        assert_eq!(shipment.expected_delivery_date, None);
    }

    #[tokio::test]
    async fn test_carrier_auth_failure_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::auth_failure());
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap();

        assert_eq!(shipment.status.as_deref(), Some(DEFAULT_STATUS));
        assert_eq!(shipment.expected_delivery_date, None);
    }

    #[tokio::test]
    async fn test_non_fedex_carrier_never_queried() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::new(
            Lookup::Found("should not be used".to_string()),
            Lookup::NotFound,
        ));
        let svc = service(store.clone(), carrier.clone());

        let shipment = svc
            .create_shipment(request("1Z999AA10123456784", "UPS"))
            .await
            .unwrap();

        assert_eq!(shipment.status.as_deref(), Some(DEFAULT_STATUS));
        assert_eq!(carrier.calls(), 0);
    }

    #[tokio::test]
    async fn test_tracking_number_stored_trimmed() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::unreachable());
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("  794687123456  ", "DHL"))
            .await
            .unwrap();

        assert_eq!(shipment.tracking_number, "794687123456");
    }

    #[tokio::test]
    async fn test_unknown_carrier_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone(), Arc::new(StubCarrier::unreachable()));

        let err = svc
            .create_shipment(request("794687123456", "USPS"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_priority_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone(), Arc::new(StubCarrier::unreachable()));

        let mut req = request("794687123456", "FedEx");
        req.priority = Some("Urgent".to_string());
        let err = svc.create_shipment(req).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_long_delivery_rendering_truncated_before_store() {
        let store = Arc::new(MemoryStore::new());
        let carrier = Arc::new(StubCarrier::new(
            Lookup::Found("In transit".to_string()),
            Lookup::Found(la_time("2024-03-01T18:00:00.123456789Z")),
        ));
        let svc = service(store.clone(), carrier);

        let shipment = svc
            .create_shipment(request("794687123456", "FedEx"))
            .await
            .unwrap();

        let stored = shipment.expected_delivery_date.unwrap();
        assert_eq!(stored.chars().count(), MAX_DELIVERY_DATE_LEN);
    }
}
