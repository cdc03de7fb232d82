//! Inventory ledger error types.

use common::ProductId;
use thiserror::Error;

use crate::reservation::ReservationStatus;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No inventory item exists for the given product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No reservation exists with the given id.
    #[error("Reservation not found")]
    ReservationNotFound,

    /// Not enough available stock to satisfy a reservation request.
    #[error(
        "Insufficient inventory for product {product_id}. Available: {available}, Requested: {requested}"
    )]
    Insufficient {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// The reservation is not in a state that permits the operation.
    #[error("Reservation cannot be {operation} from status {status}")]
    InvalidState {
        operation: &'static str,
        status: ReservationStatus,
    },

    /// Malformed or out-of-range input. Never mutates state.
    #[error("Validation error: {0}")]
    Validation(String),
}
