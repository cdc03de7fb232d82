//! Shipment tracking for the order fulfillment saga.
//!
//! The tracker owns shipment records and their status state machine, and
//! synthesizes tracking history for customer-facing lookups by tracking
//! number.

pub mod error;
pub mod shipment;
pub mod status;
pub mod tracker;

pub use error::ShippingError;
pub use shipment::{Shipment, ShipmentItem, ShippingAddress, TrackingStep, TrackingView};
pub use status::ShipmentStatus;
pub use tracker::{DEFAULT_CARRIER, DELIVERY_LEAD_DAYS, ShipmentTracker};
