//! Domain models

mod shipment;

pub use shipment::{
    CarrierKind, CreateShipmentRequest, NewShipment, Priority, Shipment, DEFAULT_STATUS,
    DELIVERED_STATUS,
};
