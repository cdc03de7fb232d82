//! Shipment tracker owning shipment records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use common::{CustomerId, OrderId, ShipmentId};
use uuid::Uuid;

use crate::error::ShippingError;
use crate::shipment::{Shipment, ShipmentItem, ShippingAddress, TrackingStep, TrackingView};
use crate::status::ShipmentStatus;

/// Days between shipment creation and the estimated delivery date.
pub const DELIVERY_LEAD_DAYS: i64 = 3;

/// Carrier assigned to every shipment.
pub const DEFAULT_CARRIER: &str = "ヤマト運輸";

const LOCATION_CENTER: &str = "配送センター";

/// Owns shipments and mutates them atomically.
///
/// Status changes take the write lock for their whole duration so the
/// transition check and the update are one step.
#[derive(Debug, Clone, Default)]
pub struct ShipmentTracker {
    shipments: Arc<RwLock<HashMap<ShipmentId, Shipment>>>,
}

impl ShipmentTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shipment in `Pending` status with a fresh tracking number.
    pub async fn create(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
        address: ShippingAddress,
        items: Vec<ShipmentItem>,
    ) -> Result<Shipment, ShippingError> {
        address.validate()?;
        if items.is_empty() {
            return Err(ShippingError::Validation(
                "Items must be a non-empty array".to_string(),
            ));
        }
        if items.iter().any(|item| item.quantity == 0) {
            return Err(ShippingError::Validation(
                "Each item must have productId and quantity > 0".to_string(),
            ));
        }

        let now = Utc::now();
        let shipment = Shipment {
            shipment_id: ShipmentId::new(),
            order_id,
            customer_id,
            shipping_address: address,
            items,
            status: ShipmentStatus::Pending,
            tracking_number: format!("TRK-{}", Uuid::new_v4().simple()),
            carrier: DEFAULT_CARRIER.to_string(),
            estimated_delivery: now + Duration::days(DELIVERY_LEAD_DAYS),
            created_at: now,
            shipped_at: None,
            delivered_at: None,
            last_updated: now,
        };

        self.shipments
            .write()
            .unwrap()
            .insert(shipment.shipment_id, shipment.clone());
        tracing::info!(
            shipment_id = %shipment.shipment_id,
            %order_id,
            tracking_number = %shipment.tracking_number,
            "shipment created"
        );
        Ok(shipment)
    }

    /// Moves a shipment to a new status, recording shipped/delivered times.
    pub async fn update_status(
        &self,
        shipment_id: ShipmentId,
        new_status: ShipmentStatus,
    ) -> Result<Shipment, ShippingError> {
        let mut shipments = self.shipments.write().unwrap();
        let shipment = shipments
            .get_mut(&shipment_id)
            .ok_or(ShippingError::ShipmentNotFound(shipment_id))?;

        if !shipment.status.can_transition_to(new_status) {
            return Err(ShippingError::InvalidTransition {
                from: shipment.status,
                to: new_status,
            });
        }

        let now = Utc::now();
        shipment.status = new_status;
        shipment.last_updated = now;
        match new_status {
            ShipmentStatus::Shipped => shipment.shipped_at = Some(now),
            ShipmentStatus::Delivered => shipment.delivered_at = Some(now),
            _ => {}
        }

        tracing::info!(%shipment_id, status = %new_status, "shipment status updated");
        Ok(shipment.clone())
    }

    /// Returns a snapshot of a shipment.
    pub async fn shipment(&self, shipment_id: ShipmentId) -> Result<Shipment, ShippingError> {
        self.shipments
            .read()
            .unwrap()
            .get(&shipment_id)
            .cloned()
            .ok_or(ShippingError::ShipmentNotFound(shipment_id))
    }

    /// Looks up a shipment by tracking number and synthesizes its history.
    ///
    /// Steps the shipment has passed through get fixed offsets from creation
    /// when no explicit timestamp was recorded.
    pub async fn track(&self, tracking_number: &str) -> Result<TrackingView, ShippingError> {
        let shipments = self.shipments.read().unwrap();
        let shipment = shipments
            .values()
            .find(|s| s.tracking_number == tracking_number)
            .ok_or_else(|| ShippingError::TrackingNumberNotFound(tracking_number.to_string()))?;

        let mut history = vec![TrackingStep {
            status: ShipmentStatus::Pending,
            description: "注文を受け付けました".to_string(),
            timestamp: shipment.created_at,
            location: LOCATION_CENTER.to_string(),
        }];

        if shipment.status != ShipmentStatus::Pending {
            history.push(TrackingStep {
                status: ShipmentStatus::Processing,
                description: "商品を準備中です".to_string(),
                timestamp: shipment.created_at + Duration::hours(1),
                location: LOCATION_CENTER.to_string(),
            });
        }

        if matches!(
            shipment.status,
            ShipmentStatus::Shipped | ShipmentStatus::Delivered
        ) {
            history.push(TrackingStep {
                status: ShipmentStatus::Shipped,
                description: "商品が発送されました".to_string(),
                timestamp: shipment
                    .shipped_at
                    .unwrap_or(shipment.created_at + Duration::hours(2)),
                location: LOCATION_CENTER.to_string(),
            });
        }

        if shipment.status == ShipmentStatus::Delivered {
            history.push(TrackingStep {
                status: ShipmentStatus::Delivered,
                description: "配送が完了しました".to_string(),
                timestamp: shipment.delivered_at.unwrap_or_else(Utc::now),
                location: shipment.shipping_address.city.clone(),
            });
        }

        Ok(TrackingView {
            tracking_number: shipment.tracking_number.clone(),
            current_status: shipment.status,
            estimated_delivery: shipment.estimated_delivery,
            carrier: shipment.carrier.clone(),
            tracking_history: history,
        })
    }
}
