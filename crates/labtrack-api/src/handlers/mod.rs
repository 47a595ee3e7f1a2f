pub mod shipment_create;
pub mod shipment_receive;
pub mod shipments_list;

use labtrack_core::models::Shipment;
use serde::Serialize;
use utoipa::ToSchema;

/// Response body for operations returning a single shipment.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentResponse {
    pub message: String,
    pub shipment: Shipment,
}

/// Response body for the listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentsResponse {
    pub shipments: Vec<Shipment>,
}
