use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Status assigned to new shipments when the carrier reports nothing better.
pub const DEFAULT_STATUS: &str = "In Transit";

/// Status stamped when a shipment is marked received.
pub const DELIVERED_STATUS: &str = "Delivered";

/// Supported carriers.
///
/// Only FedEx drives status/date enrichment; UPS and DHL shipments are stored
/// with the default status and no delivery estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum CarrierKind {
    FedEx,
    #[serde(rename = "UPS")]
    Ups,
    #[serde(rename = "DHL")]
    Dhl,
}

impl Display for CarrierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CarrierKind::FedEx => write!(f, "FedEx"),
            CarrierKind::Ups => write!(f, "UPS"),
            CarrierKind::Dhl => write!(f, "DHL"),
        }
    }
}

impl FromStr for CarrierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FedEx" => Ok(CarrierKind::FedEx),
            "UPS" => Ok(CarrierKind::Ups),
            "DHL" => Ok(CarrierKind::Dhl),
            _ => Err(anyhow::anyhow!("Invalid carrier: {}", s)),
        }
    }
}

/// Shipment priority label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            _ => Err(anyhow::anyhow!("Invalid priority: {}", s)),
        }
    }
}

/// A persisted shipment row.
///
/// `status` is NULL when the carrier definitively did not recognize the
/// tracking number at creation time. `date_received` is the sole "received"
/// flag; once set it is never cleared.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shipment {
    pub id: Uuid,
    pub tracking_number: String,
    pub carrier: String,
    pub status: Option<String>,
    pub sample_type: Option<String>,
    pub priority: Option<String>,
    pub expected_delivery_date: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_received: Option<DateTime<Utc>>,
}

impl Shipment {
    /// A shipment is active until a receipt timestamp is stamped.
    pub fn is_active(&self) -> bool {
        self.date_received.is_none()
    }
}

/// Fields for inserting a new shipment. `id` and `date_created` are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub tracking_number: String,
    pub carrier: CarrierKind,
    pub status: Option<String>,
    pub sample_type: Option<String>,
    pub priority: Option<Priority>,
    pub expected_delivery_date: Option<String>,
}

/// Request body for `POST /shipments`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShipmentRequest {
    pub tracking_number: Option<String>,
    pub carrier: String,
    pub sample_type: Option<String>,
    pub priority: Option<String>,
}
