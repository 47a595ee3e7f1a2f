//! FedEx carrier integration
//!
//! This crate owns the OAuth token cache and the tracking lookups used to
//! enrich new shipments with a carrier status and an expected delivery date.

pub mod fedex;
pub mod token;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use labtrack_core::AppError;

pub use fedex::{format_delivery_date, FedExClient, MAX_DELIVERY_DATE_LEN};
pub use token::{AccessToken, TokenCache};

/// Outcome of a single carrier lookup.
///
/// `NotFound` means the carrier answered and does not recognize the tracking
/// number; `Unavailable` means the call itself failed (network, HTTP error).
/// The two are deliberately distinct so callers can apply different policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unavailable => Lookup::Unavailable,
        }
    }

    /// Like `map`, but the closure may itself come up empty.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unavailable => Lookup::Unavailable,
        }
    }
}

/// Seam between the ingestion workflow and the carrier API, so the workflow
/// can be exercised with a stub provider in tests.
#[async_trait]
pub trait TrackingProvider: Send + Sync {
    /// Current human-readable status for a tracking number.
    async fn status(&self, tracking_number: &str) -> Result<Lookup<String>, AppError>;

    /// Actual or estimated delivery time, converted to the display timezone.
    async fn expected_delivery(&self, tracking_number: &str)
        -> Result<Lookup<DateTime<Tz>>, AppError>;
}
