//! Payment error types.

use common::{CustomerId, Money, PaymentId};
use thiserror::Error;

use crate::processor::PaymentStatus;

/// Errors that can occur during wallet and payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Malformed or out-of-range input. Never mutates state.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No payment exists with the given id.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// No wallet exists for the customer.
    #[error("Wallet not found for customer {0}")]
    WalletNotFound(CustomerId),

    /// The wallet balance cannot cover the requested amount.
    #[error("Insufficient wallet balance. Available: {available}, Required: {required}")]
    InsufficientFunds { available: Money, required: Money },

    /// The payment is not in a state that permits the operation.
    #[error("Payment cannot be refunded. Current status: {status}")]
    InvalidState { status: PaymentStatus },

    /// The card gateway declined the charge. A failed payment record was
    /// kept for the attempt.
    #[error("Payment declined by gateway (payment {payment_id})")]
    Declined { payment_id: PaymentId },
}
