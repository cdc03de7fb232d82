//! Payment processing for the order fulfillment saga.
//!
//! Two components live here: the wallet ledger, which owns prepaid
//! per-customer balances, and the payment processor, which records payments
//! and refunds. Card authorization is a pluggable decision function so the
//! simulated gateway can be swapped for a deterministic one in tests.

pub mod error;
pub mod gateway;
pub mod processor;
pub mod wallet;

pub use error::PaymentError;
pub use gateway::{ApproveAll, CardGateway, DeclineAll, RandomGateway};
pub use processor::{Payment, PaymentMethod, PaymentProcessor, PaymentStatus, Refund};
pub use wallet::{Wallet, WalletLedger};

/// Currency used when the caller does not specify one.
pub const DEFAULT_CURRENCY: &str = "JPY";
