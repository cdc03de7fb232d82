//! Saga error types.

use common::OrderId;
use inventory::InventoryError;
use payment::PaymentError;
use shipping::ShippingError;
use thiserror::Error;

/// Errors that can occur during saga operations.
///
/// A ledger failure at any step surfaces here unchanged as the order-level
/// root cause. Compensation failures are logged, never returned over the
/// primary error.
#[derive(Debug, Error)]
pub enum SagaError {
    /// Malformed order request. Never starts the saga.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Inventory ledger error.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Payment processor or wallet ledger error.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Shipment tracker error.
    #[error("Shipping error: {0}")]
    Shipping(#[from] ShippingError),

    /// A compensation step failed. Logged as a secondary error only.
    #[error("Compensation step '{step}' failed: {reason}")]
    CompensationFailed { step: String, reason: String },
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
