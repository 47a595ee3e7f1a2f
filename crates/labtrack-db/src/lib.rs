//! Database repositories for the data access layer
//!
//! Each repository owns the queries for one table and maps storage-level
//! failures onto the shared `AppError` taxonomy.

pub mod db;

pub use db::{ShipmentRepository, ShipmentStore};
