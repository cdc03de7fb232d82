//! Saga coordinator for order fulfillment.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use common::{CustomerId, Money, OrderId, PaymentId, ReservationId, ShipmentId};
use inventory::{InventoryError, InventoryLedger, ReservationRequest};
use payment::{PaymentMethod, PaymentProcessor};
use shipping::{ShipmentItem, ShipmentStatus, ShipmentTracker};

use crate::error::SagaError;
use crate::order::{Order, OrderItem, OrderRequest, OrderStatus};
use crate::steps;

/// Undo action for a committed saga step, pushed as the step commits and
/// popped in reverse order on failure.
#[derive(Debug, Clone)]
enum CompensationAction {
    CancelReservation(ReservationId),
    RefundPayment(PaymentId),
    CancelShipment(ShipmentId),
}

impl CompensationAction {
    fn step(&self) -> &'static str {
        match self {
            CompensationAction::CancelReservation(_) => steps::STEP_RESERVE_INVENTORY,
            CompensationAction::RefundPayment(_) => steps::STEP_CHARGE_PAYMENT,
            CompensationAction::CancelShipment(_) => steps::STEP_CREATE_SHIPMENT,
        }
    }
}

/// Orchestrates order fulfillment sagas across the three ledgers.
///
/// The coordinator exclusively owns order records and holds only identifiers
/// into the ledgers; it never mutates ledger state directly. The saga is not
/// atomic across ledgers; consistency comes from the ordered
/// execute/compensate protocol, and compensation is best-effort: a failed
/// undo is logged but never reported over the primary failure.
#[derive(Clone)]
pub struct OrderCoordinator {
    inventory: InventoryLedger,
    payments: PaymentProcessor,
    shipping: ShipmentTracker,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl OrderCoordinator {
    /// Creates a coordinator over the given ledgers.
    pub fn new(
        inventory: InventoryLedger,
        payments: PaymentProcessor,
        shipping: ShipmentTracker,
    ) -> Self {
        Self {
            inventory,
            payments,
            shipping,
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Executes the order fulfillment saga for one request.
    ///
    /// Read-only pre-checks (product existence, availability, wallet
    /// balance) run before any mutation so their failures need no
    /// compensation and leave no order record. Once the steps start, any
    /// failure unwinds the compensation stack and finalizes a `Failed`
    /// order carrying the root cause; failed orders stay queryable.
    #[tracing::instrument(skip(self, request), fields(saga_type = steps::SAGA_TYPE, customer_id = %request.customer_id))]
    pub async fn process_order(&self, request: OrderRequest) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = std::time::Instant::now();

        // 1. Validate the request shape.
        if request.items.is_empty() {
            return Err(SagaError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        for line in &request.items {
            if line.product_id.as_str().trim().is_empty() || line.quantity == 0 {
                return Err(SagaError::Validation(
                    "Each item must have productId and quantity > 0".to_string(),
                ));
            }
        }

        // 2. Price the order from the ledger and pre-check availability.
        let mut items = Vec::with_capacity(request.items.len());
        let mut total_amount = Money::zero();
        for line in &request.items {
            let stock = self.inventory.item(&line.product_id).await?;
            if stock.available_quantity() < line.quantity {
                return Err(InventoryError::Insufficient {
                    product_id: line.product_id.clone(),
                    available: stock.available_quantity(),
                    requested: line.quantity,
                }
                .into());
            }
            total_amount += stock.unit_price.multiply(line.quantity);
            items.push(OrderItem {
                product_id: line.product_id.clone(),
                product_name: stock.product_name,
                quantity: line.quantity,
                unit_price: stock.unit_price,
            });
        }

        // 3. Wallet orders fail fast when the balance cannot cover the total.
        if request.payment_method == PaymentMethod::Wallet {
            let wallet = self
                .payments
                .wallet()
                .balance(request.customer_id)
                .await?;
            if wallet.balance < total_amount {
                return Err(payment::PaymentError::InsufficientFunds {
                    available: wallet.balance,
                    required: total_amount,
                }
                .into());
            }
        }

        let order_id = OrderId::new();
        let mut order = Order {
            order_id,
            customer_id: request.customer_id,
            items,
            total_amount,
            shipping_address: request.shipping_address,
            payment_method: request.payment_method,
            status: OrderStatus::Processing,
            reservation_id: None,
            payment_id: None,
            shipment_id: None,
            tracking_number: None,
            failure_reason: None,
            created_at: Utc::now(),
        };
        let mut compensations: Vec<CompensationAction> = Vec::new();

        // 4. Reserve inventory. Nothing to compensate if this fails.
        tracing::info!(%order_id, step = steps::STEP_RESERVE_INVENTORY, "saga step started");
        let requests: Vec<ReservationRequest> = order
            .items
            .iter()
            .map(|item| ReservationRequest {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect();
        let reservation = match self
            .inventory
            .reserve(order_id, order.customer_id, &requests)
            .await
        {
            Ok(reservation) => reservation,
            Err(e) => return self.fail(order, compensations, e.into(), saga_start).await,
        };
        order.reservation_id = Some(reservation.reservation_id);
        compensations.push(CompensationAction::CancelReservation(
            reservation.reservation_id,
        ));

        // 5. Charge the customer.
        tracing::info!(%order_id, step = steps::STEP_CHARGE_PAYMENT, "saga step started");
        let payment = match self
            .payments
            .charge(
                order_id,
                order.customer_id,
                order.total_amount,
                order.payment_method,
                payment::DEFAULT_CURRENCY,
            )
            .await
        {
            Ok(payment) => payment,
            Err(e) => return self.fail(order, compensations, e.into(), saga_start).await,
        };
        order.payment_id = Some(payment.payment_id);
        compensations.push(CompensationAction::RefundPayment(payment.payment_id));

        // 6. Create the shipment for the reserved items.
        tracing::info!(%order_id, step = steps::STEP_CREATE_SHIPMENT, "saga step started");
        let shipment_items: Vec<ShipmentItem> = order
            .items
            .iter()
            .map(|item| ShipmentItem {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
            })
            .collect();
        let shipment = match self
            .shipping
            .create(
                order_id,
                order.customer_id,
                order.shipping_address.clone(),
                shipment_items,
            )
            .await
        {
            Ok(shipment) => shipment,
            Err(e) => return self.fail(order, compensations, e.into(), saga_start).await,
        };
        order.shipment_id = Some(shipment.shipment_id);
        order.tracking_number = Some(shipment.tracking_number);
        compensations.push(CompensationAction::CancelShipment(shipment.shipment_id));

        // 7. Confirm the reservation, permanently removing the stock.
        tracing::info!(%order_id, step = steps::STEP_CONFIRM_RESERVATION, "saga step started");
        if let Err(e) = self.inventory.confirm(reservation.reservation_id).await {
            return self.fail(order, compensations, e.into(), saga_start).await;
        }

        // 8. Finalize the order.
        order.status = OrderStatus::Confirmed;
        self.orders
            .write()
            .unwrap()
            .insert(order_id, order.clone());

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        metrics::counter!("saga_completed").increment(1);
        tracing::info!(%order_id, duration, "saga completed successfully");
        Ok(order)
    }

    /// Returns a snapshot of an order.
    pub async fn order(&self, order_id: OrderId) -> Result<Order, SagaError> {
        self.orders
            .read()
            .unwrap()
            .get(&order_id)
            .cloned()
            .ok_or(SagaError::OrderNotFound(order_id))
    }

    /// Returns all orders recorded for a customer, oldest first.
    pub async fn orders_for_customer(&self, customer_id: CustomerId) -> Vec<Order> {
        let orders = self.orders.read().unwrap();
        let mut orders: Vec<Order> = orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        orders
    }

    /// Unwinds the compensation stack and finalizes the order as failed.
    ///
    /// Always returns the primary error; compensation failures are logged
    /// as secondary.
    async fn fail(
        &self,
        mut order: Order,
        compensations: Vec<CompensationAction>,
        primary: SagaError,
        saga_start: std::time::Instant,
    ) -> Result<Order, SagaError> {
        let order_id = order.order_id;
        tracing::warn!(%order_id, error = %primary, "saga step failed, compensating");

        for action in compensations.into_iter().rev() {
            let step = action.step();
            let outcome = match action {
                CompensationAction::CancelShipment(shipment_id) => self
                    .shipping
                    .update_status(shipment_id, ShipmentStatus::Cancelled)
                    .await
                    .map(drop)
                    .map_err(|e| e.to_string()),
                CompensationAction::RefundPayment(payment_id) => self
                    .payments
                    .refund(payment_id, None, "Order compensation")
                    .await
                    .map(drop)
                    .map_err(|e| e.to_string()),
                CompensationAction::CancelReservation(reservation_id) => self
                    .inventory
                    .cancel(reservation_id)
                    .await
                    .map_err(|e| e.to_string()),
            };
            match outcome {
                Ok(()) => tracing::info!(%order_id, step, "compensation step completed"),
                Err(reason) => {
                    let secondary = SagaError::CompensationFailed {
                        step: step.to_string(),
                        reason,
                    };
                    tracing::warn!(%order_id, error = %secondary, "compensation step failed");
                }
            }
        }

        order.status = OrderStatus::Failed;
        order.failure_reason = Some(primary.to_string());
        self.orders.write().unwrap().insert(order_id, order);

        metrics::histogram!("saga_duration_seconds").record(saga_start.elapsed().as_secs_f64());
        metrics::counter!("saga_failed").increment(1);
        Err(primary)
    }
}
