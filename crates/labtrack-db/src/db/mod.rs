pub mod shipment;

pub use shipment::{ShipmentRepository, ShipmentStore};
