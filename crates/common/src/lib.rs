//! Shared types for the order fulfillment saga.
//!
//! Every component generates its own identifiers at creation time; callers
//! never choose them. The newtypes here keep the different id spaces from
//! being mixed up at compile time.

pub mod ids;
pub mod money;

pub use ids::{CustomerId, OrderId, PaymentId, ProductId, RefundId, ReservationId, ShipmentId};
pub use money::Money;
