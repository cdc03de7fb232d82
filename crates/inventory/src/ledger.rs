//! The inventory ledger.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use common::{CustomerId, OrderId, ProductId, ReservationId};

use crate::error::InventoryError;
use crate::item::{InventoryItem, InventoryPatch, NewItem};
use crate::reservation::{Reservation, ReservationRequest, ReservationStatus, ReservedItem};

/// Hours a reservation is advertised to be held for.
pub const RESERVATION_TTL_HOURS: i64 = 24;

#[derive(Debug, Default)]
struct LedgerState {
    items: HashMap<ProductId, InventoryItem>,
    reservations: HashMap<ReservationId, Reservation>,
}

/// Owns per-product stock counts and in-flight reservations.
///
/// Every mutating operation takes the write lock for its whole duration, so
/// the availability check and the stock adjustment are observed as one
/// atomic step. Reads return cloned snapshots; callers never see a mutable
/// entity reference.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InventoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the ledger.
    pub async fn add_item(&self, new: NewItem) -> Result<InventoryItem, InventoryError> {
        if new.product_name.trim().is_empty() {
            return Err(InventoryError::Validation(
                "Product name is required".to_string(),
            ));
        }
        if !new.unit_price.is_positive() {
            return Err(InventoryError::Validation(
                "Unit price must be greater than 0".to_string(),
            ));
        }

        let mut state = self.state.write().unwrap();
        if state.items.contains_key(&new.product_id) {
            return Err(InventoryError::Validation(format!(
                "Product {} already exists",
                new.product_id
            )));
        }

        let item = InventoryItem {
            product_id: new.product_id.clone(),
            product_name: new.product_name,
            category: new.category,
            quantity: new.quantity,
            reserved_quantity: 0,
            unit_price: new.unit_price,
            low_stock_threshold: new.low_stock_threshold,
            last_updated: Utc::now(),
        };
        state.items.insert(new.product_id, item.clone());
        Ok(item)
    }

    /// Returns a snapshot of one product's stock position.
    pub async fn item(&self, product_id: &ProductId) -> Result<InventoryItem, InventoryError> {
        self.state
            .read()
            .unwrap()
            .items
            .get(product_id)
            .cloned()
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))
    }

    /// Lists all items, optionally filtered by category.
    pub async fn items(&self, category: Option<&str>) -> Vec<InventoryItem> {
        let state = self.state.read().unwrap();
        let mut items: Vec<InventoryItem> = state
            .items
            .values()
            .filter(|item| category.is_none_or(|c| item.category == c))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        items
    }

    /// Returns a snapshot of a reservation.
    pub async fn reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Reservation, InventoryError> {
        self.state
            .read()
            .unwrap()
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or(InventoryError::ReservationNotFound)
    }

    /// Reserves stock for an order, all-or-nothing.
    ///
    /// Checks every requested line against available stock before mutating
    /// anything; if any line is short, the call fails with no partial
    /// reservation.
    pub async fn reserve(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
        requests: &[ReservationRequest],
    ) -> Result<Reservation, InventoryError> {
        if requests.is_empty() {
            return Err(InventoryError::Validation(
                "At least one item is required".to_string(),
            ));
        }
        for request in requests {
            if request.quantity == 0 {
                return Err(InventoryError::Validation(
                    "Each item must have quantity > 0".to_string(),
                ));
            }
        }

        let mut state = self.state.write().unwrap();
        let now = Utc::now();

        let mut lines = Vec::with_capacity(requests.len());
        for request in requests {
            let item = state
                .items
                .get(&request.product_id)
                .ok_or_else(|| InventoryError::ProductNotFound(request.product_id.clone()))?;
            if item.available_quantity() < request.quantity {
                return Err(InventoryError::Insufficient {
                    product_id: request.product_id.clone(),
                    available: item.available_quantity(),
                    requested: request.quantity,
                });
            }
            lines.push(ReservedItem {
                product_id: request.product_id.clone(),
                product_name: item.product_name.clone(),
                reserved_quantity: request.quantity,
                unit_price: item.unit_price,
            });
        }

        for line in &lines {
            if let Some(item) = state.items.get_mut(&line.product_id) {
                item.reserved_quantity += line.reserved_quantity;
                item.last_updated = now;
            }
        }

        let reservation = Reservation {
            reservation_id: ReservationId::new(),
            order_id,
            customer_id,
            items: lines,
            status: ReservationStatus::Reserved,
            expires_at: now + Duration::hours(RESERVATION_TTL_HOURS),
            created_at: now,
            confirmed_at: None,
            cancelled_at: None,
        };
        state
            .reservations
            .insert(reservation.reservation_id, reservation.clone());

        tracing::info!(
            reservation_id = %reservation.reservation_id,
            %order_id,
            lines = reservation.items.len(),
            "inventory reserved"
        );
        Ok(reservation)
    }

    /// Confirms a reservation, completing the stock removal.
    ///
    /// Only legal from `Reserved`; both the owned and reserved counts drop
    /// by the held amounts.
    pub async fn confirm(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Reservation, InventoryError> {
        let mut state = self.state.write().unwrap();
        let now = Utc::now();

        let reservation = state
            .reservations
            .get(&reservation_id)
            .ok_or(InventoryError::ReservationNotFound)?;
        if !reservation.status.can_confirm() {
            return Err(InventoryError::InvalidState {
                operation: "confirmed",
                status: reservation.status,
            });
        }

        let lines = reservation.items.clone();
        for line in &lines {
            if let Some(item) = state.items.get_mut(&line.product_id) {
                item.quantity -= line.reserved_quantity;
                item.reserved_quantity -= line.reserved_quantity;
                item.last_updated = now;
            }
        }

        let reservation = state
            .reservations
            .get_mut(&reservation_id)
            .ok_or(InventoryError::ReservationNotFound)?;
        reservation.status = ReservationStatus::Confirmed;
        reservation.confirmed_at = Some(now);
        Ok(reservation.clone())
    }

    /// Cancels a reservation.
    ///
    /// From `Reserved`, the held stock is returned to the available pool.
    /// From `Confirmed` or `Cancelled`, only the status is set: confirmed
    /// stock is never un-deducted, and cancelling twice is a no-op on stock.
    pub async fn cancel(&self, reservation_id: ReservationId) -> Result<(), InventoryError> {
        let mut state = self.state.write().unwrap();
        let now = Utc::now();

        let reservation = state
            .reservations
            .get(&reservation_id)
            .ok_or(InventoryError::ReservationNotFound)?;

        if reservation.status.holds_stock() {
            let lines = reservation.items.clone();
            for line in &lines {
                if let Some(item) = state.items.get_mut(&line.product_id) {
                    item.reserved_quantity -= line.reserved_quantity;
                    item.last_updated = now;
                }
            }
        }

        let reservation = state
            .reservations
            .get_mut(&reservation_id)
            .ok_or(InventoryError::ReservationNotFound)?;
        reservation.status = ReservationStatus::Cancelled;
        if reservation.cancelled_at.is_none() {
            reservation.cancelled_at = Some(now);
        }

        tracing::info!(%reservation_id, "reservation cancelled");
        Ok(())
    }

    /// Applies a partial update to a product's counts.
    pub async fn update(
        &self,
        product_id: &ProductId,
        patch: InventoryPatch,
    ) -> Result<InventoryItem, InventoryError> {
        let mut state = self.state.write().unwrap();
        let item = state
            .items
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))?;

        let quantity = patch.quantity.unwrap_or(item.quantity);
        let reserved_quantity = patch.reserved_quantity.unwrap_or(item.reserved_quantity);
        if reserved_quantity > quantity {
            return Err(InventoryError::Validation(format!(
                "Reserved quantity ({reserved_quantity}) cannot exceed quantity ({quantity})"
            )));
        }

        item.quantity = quantity;
        item.reserved_quantity = reserved_quantity;
        item.last_updated = Utc::now();
        Ok(item.clone())
    }

    /// Adds stock to a product.
    pub async fn restock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<InventoryItem, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::Validation(
                "Quantity must be greater than 0".to_string(),
            ));
        }

        let mut state = self.state.write().unwrap();
        let item = state
            .items
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))?;
        item.quantity += quantity;
        item.last_updated = Utc::now();

        tracing::info!(%product_id, quantity, new_total = item.quantity, "restocked");
        Ok(item.clone())
    }
}
