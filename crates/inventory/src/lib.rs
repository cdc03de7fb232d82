//! Inventory ledger for the order fulfillment saga.
//!
//! Owns per-product stock counts and in-flight reservations. Reserving stock
//! is all-or-nothing across the requested items; a reservation is later
//! confirmed (stock permanently removed) or cancelled (stock returned to
//! the available pool).

pub mod error;
pub mod item;
pub mod ledger;
pub mod reservation;

pub use error::InventoryError;
pub use item::{InventoryItem, InventoryPatch, NewItem};
pub use ledger::{InventoryLedger, RESERVATION_TTL_HOURS};
pub use reservation::{Reservation, ReservationRequest, ReservationStatus, ReservedItem};
