//! Order fulfillment saga coordinator.
//!
//! The coordinator drives a 4-step saga (reserve inventory → charge payment →
//! create shipment → confirm reservation) against the inventory ledger, the
//! payment processor and the shipment tracker. After each committed step an
//! undo action is pushed onto a compensation stack; when a later step fails
//! the stack is unwound in reverse order and the order is finalized as
//! failed with the root cause of the step that broke.

pub mod coordinator;
pub mod error;
pub mod order;
pub mod steps;

pub use coordinator::OrderCoordinator;
pub use error::SagaError;
pub use order::{Order, OrderItem, OrderLine, OrderRequest, OrderStatus};
