//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use labtrack_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labtrack API",
        version = "0.1.0",
        description = "Laboratory sample shipment tracking. Create shipments with optional FedEx status/delivery enrichment, list them newest first, and mark them received."
    ),
    paths(
        handlers::shipments_list::list_shipments,
        handlers::shipment_create::create_shipment,
        handlers::shipment_receive::receive_shipment,
    ),
    components(schemas(
        models::Shipment,
        models::CreateShipmentRequest,
        models::CarrierKind,
        models::Priority,
        handlers::ShipmentResponse,
        handlers::ShipmentsResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "shipments", description = "Shipment tracking endpoints")
    )
)]
pub struct ApiDoc;
