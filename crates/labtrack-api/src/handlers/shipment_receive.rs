use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ShipmentResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Mark a shipment as received by stamping the receipt timestamp. Re-invoking
/// overwrites the timestamp; there is no un-receive operation.
#[utoipa::path(
    patch,
    path = "/shipments/{id}",
    tag = "shipments",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment marked as received", body = ShipmentResponse),
        (status = 404, description = "Shipment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn receive_shipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let shipment = state.shipments.mark_received(id, Utc::now()).await?;

    tracing::info!(shipment_id = %shipment.id, "Shipment marked as received");

    Ok(Json(ShipmentResponse {
        message: "Shipment marked as received".to_string(),
        shipment,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, MemoryStore};
    use axum::http::StatusCode;
    use chrono::Duration;
    use labtrack_core::models::DELIVERED_STATUS;

    #[tokio::test]
    async fn receiving_unknown_shipment_returns_not_found() {
        let store = Arc::new(MemoryStore::new());

        let response = receive_shipment(State(test_state(store)), Path(Uuid::new_v4()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn receiving_stamps_timestamp_and_marks_delivered() {
        let store = Arc::new(MemoryStore::new());
        let id = store.seed_at("794687123456", Utc::now() - Duration::seconds(60));

        let response = receive_shipment(State(test_state(store.clone())), Path(id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let shipment = store.get(id).unwrap();
        let received = shipment.date_received.unwrap();
        assert!(received >= shipment.date_created);
        assert_eq!(shipment.status.as_deref(), Some(DELIVERED_STATUS));
    }
}
