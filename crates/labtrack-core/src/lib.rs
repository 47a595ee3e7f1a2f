//! Labtrack Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all labtrack components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, FedExConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::validate_tracking_number;
