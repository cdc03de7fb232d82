//! Shipment records and tracking views.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::error::ShippingError;
use crate::status::ShipmentStatus;

/// A Japanese-style delivery address. All fields except `phone` are
/// mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ShippingAddress {
    /// Checks that every mandatory field is present.
    pub fn validate(&self) -> Result<(), ShippingError> {
        let fields = [
            ("name", &self.name),
            ("postalCode", &self.postal_code),
            ("prefecture", &self.prefecture),
            ("city", &self.city),
            ("address", &self.address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ShippingError::Validation(format!(
                    "Missing required address field: {field}"
                )));
            }
        }
        Ok(())
    }
}

/// A line item included in a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
}

/// A shipment owned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub shipment_id: ShipmentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub shipping_address: ShippingAddress,
    pub items: Vec<ShipmentItem>,
    pub status: ShipmentStatus,
    pub tracking_number: String,
    pub carrier: String,
    pub estimated_delivery: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

/// One step in a shipment's synthesized tracking history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStep {
    pub status: ShipmentStatus,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
}

/// Customer-facing view returned by tracking-number lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub tracking_number: String,
    pub current_status: ShipmentStatus,
    pub estimated_delivery: DateTime<Utc>,
    pub carrier: String,
    pub tracking_history: Vec<TrackingStep>,
}
