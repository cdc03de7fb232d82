//! Inventory item records.

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product's stock position in the ledger.
///
/// `quantity` is the total owned stock; `reserved_quantity` is held by open
/// reservations. Available stock is always derived, never stored, so the
/// invariant `reserved_quantity <= quantity` is the only thing the ledger
/// has to maintain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    pub reserved_quantity: u32,
    pub unit_price: Money,
    pub low_stock_threshold: u32,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Stock not held by any open reservation.
    pub fn available_quantity(&self) -> u32 {
        self.quantity - self.reserved_quantity
    }

    /// True once available stock falls to the low-stock threshold or below.
    pub fn is_low_stock(&self) -> bool {
        self.available_quantity() <= self.low_stock_threshold
    }
}

/// Input record for adding a product to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub low_stock_threshold: u32,
}

/// Partial update applied to an inventory item.
///
/// Quantities are unsigned, so negative values are unrepresentable; the
/// ledger still rejects patches that would leave more stock reserved than
/// owned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryPatch {
    pub quantity: Option<u32>,
    pub reserved_quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, reserved: u32, threshold: u32) -> InventoryItem {
        InventoryItem {
            product_id: ProductId::new("ITEM001"),
            product_name: "Laptop".to_string(),
            category: "Electronics".to_string(),
            quantity,
            reserved_quantity: reserved,
            unit_price: Money::from_minor(80000),
            low_stock_threshold: threshold,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn available_quantity_is_derived() {
        assert_eq!(item(50, 5, 10).available_quantity(), 45);
        assert_eq!(item(5, 5, 10).available_quantity(), 0);
    }

    #[test]
    fn low_stock_uses_available_quantity() {
        assert!(item(8, 1, 10).is_low_stock());
        assert!(!item(50, 5, 10).is_low_stock());
    }

    #[test]
    fn item_serialization_roundtrip() {
        let item = item(30, 2, 10);
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: InventoryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }
}
