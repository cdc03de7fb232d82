//! Shipping error types.

use common::ShipmentId;
use thiserror::Error;

use crate::status::ShipmentStatus;

/// Errors that can occur during shipment operations.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// Malformed or incomplete input. Never mutates state.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No shipment exists with the given id.
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(ShipmentId),

    /// No shipment carries the given tracking number.
    #[error("Tracking number not found: {0}")]
    TrackingNumberNotFound(String),

    /// The requested status change is not permitted.
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },
}
