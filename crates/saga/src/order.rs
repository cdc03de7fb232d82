//! Order records owned by the coordinator.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, PaymentId, ProductId, ReservationId, ShipmentId};
use payment::PaymentMethod;
use serde::{Deserialize, Serialize};
use shipping::ShippingAddress;

/// The outcome state of an order saga.
///
/// Status transitions:
/// ```text
/// Processing ──► Confirmed
///      │
///      └───────► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Saga steps are executing.
    #[default]
    Processing,
    /// Every step succeeded (terminal).
    Confirmed,
    /// A step failed and compensation ran (terminal).
    Failed,
}

impl OrderStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One requested line of an order, as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A submitted order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// One priced line of an order. Unit prices are captured from the inventory
/// ledger at submission and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// An order and the identifiers of the ledger entities its saga touched.
///
/// The coordinator holds only these references; the ledgers exclusively own
/// the entities behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub reservation_id: Option<ReservationId>,
    pub payment_id: Option<PaymentId>,
    pub shipment_id: Option<ShipmentId>,
    pub tracking_number: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_is_the_only_non_terminal_status() {
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_in_wire_casing() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Confirmed).unwrap(),
            "\"CONFIRMED\""
        );
        let status: OrderStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(status, OrderStatus::Failed);
    }
}
