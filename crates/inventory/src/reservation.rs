//! Inventory reservations and their status machine.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId, ReservationId};
use serde::{Deserialize, Serialize};

/// The status of a reservation.
///
/// Status transitions:
/// ```text
/// Reserved ──┬──► Confirmed
///            └──► Cancelled
/// ```
/// Confirmed and Cancelled are terminal for stock purposes; cancelling a
/// confirmed reservation flips the status but never un-deducts stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Stock is held, awaiting confirmation or cancellation.
    #[default]
    Reserved,

    /// The held stock has been permanently removed from inventory.
    Confirmed,

    /// The reservation was abandoned.
    Cancelled,
}

impl ReservationStatus {
    /// Returns true if the reservation can still be confirmed.
    pub fn can_confirm(&self) -> bool {
        matches!(self, ReservationStatus::Reserved)
    }

    /// Returns true if stock is currently held by this reservation.
    pub fn holds_stock(&self) -> bool {
        matches!(self, ReservationStatus::Reserved)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "RESERVED",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line requested for reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A reserved line, priced at reservation time from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub reserved_quantity: u32,
    pub unit_price: Money,
}

/// A hold on inventory stock pending payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub items: Vec<ReservedItem>,
    pub status: ReservationStatus,
    /// Advisory expiry; the ledger runs no background sweep.
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}
