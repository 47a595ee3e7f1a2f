use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ShipmentResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use labtrack_core::models::CreateShipmentRequest;
use std::sync::Arc;

/// Create a shipment, enriching FedEx shipments with carrier status and an
/// expected delivery date when the carrier is reachable.
#[utoipa::path(
    post,
    path = "/shipments",
    tag = "shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Duplicate tracking number", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_shipment(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateShipmentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let shipment = state.ingestion.create_shipment(request).await?;

    Ok(Json(ShipmentResponse {
        message: "Shipment added".to_string(),
        shipment,
    }))
}
