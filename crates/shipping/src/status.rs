//! Shipment status state machine.

use serde::{Deserialize, Serialize};

/// The delivery status of a shipment.
///
/// Every transition is legal, including staying in place, except that a
/// delivered shipment can only move to `Cancelled` and a cancelled shipment
/// can never ship or deliver:
/// ```text
/// Delivered ─x─► Pending | Processing | Shipped
/// Cancelled ─x─► Shipped | Delivered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Created, not yet picked up.
    #[default]
    Pending,
    /// Being prepared at the distribution center.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Arrived at the destination.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl ShipmentStatus {
    /// Returns true if this status may change to `to`.
    pub fn can_transition_to(&self, to: ShipmentStatus) -> bool {
        use ShipmentStatus::*;
        !matches!(
            (self, to),
            (Delivered, Pending | Processing | Shipped) | (Cancelled, Shipped | Delivered)
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "PENDING",
            ShipmentStatus::Processing => "PROCESSING",
            ShipmentStatus::Shipped => "SHIPPED",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
