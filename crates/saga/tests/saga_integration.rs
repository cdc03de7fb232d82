//! Integration tests for the order fulfillment saga.

use std::sync::Arc;

use common::{CustomerId, Money, ProductId};
use inventory::{InventoryError, InventoryLedger, NewItem, ReservationStatus};
use payment::{
    ApproveAll, CardGateway, DeclineAll, PaymentError, PaymentMethod, PaymentProcessor,
    PaymentStatus, WalletLedger,
};
use saga::{OrderCoordinator, OrderLine, OrderRequest, OrderStatus, SagaError};
use shipping::{ShipmentStatus, ShipmentTracker, ShippingAddress, ShippingError};

struct TestHarness {
    coordinator: OrderCoordinator,
    inventory: InventoryLedger,
    wallet: WalletLedger,
    payments: PaymentProcessor,
    shipping: ShipmentTracker,
}

impl TestHarness {
    async fn new(gateway: Arc<dyn CardGateway>) -> Self {
        let inventory = InventoryLedger::new();
        for (id, name, quantity, price) in [
            ("ITEM001", "ノートパソコン", 50, 80000),
            ("ITEM002", "スマートフォン", 30, 60000),
            ("ITEM003", "ワイヤレスイヤホン", 8, 2500),
        ] {
            inventory
                .add_item(NewItem {
                    product_id: ProductId::from(id),
                    product_name: name.to_string(),
                    category: "電化製品".to_string(),
                    quantity,
                    unit_price: Money::from_minor(price),
                    low_stock_threshold: 10,
                })
                .await
                .unwrap();
        }

        let wallet = WalletLedger::new();
        let payments = PaymentProcessor::new(wallet.clone(), gateway);
        let shipping = ShipmentTracker::new();
        let coordinator =
            OrderCoordinator::new(inventory.clone(), payments.clone(), shipping.clone());

        Self {
            coordinator,
            inventory,
            wallet,
            payments,
            shipping,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "山田太郎".to_string(),
            postal_code: "150-0001".to_string(),
            prefecture: "東京都".to_string(),
            city: "渋谷区".to_string(),
            address: "神宮前1-1-1".to_string(),
            phone: Some("090-1234-5678".to_string()),
        }
    }

    fn request(
        customer_id: CustomerId,
        lines: &[(&str, u32)],
        method: PaymentMethod,
    ) -> OrderRequest {
        OrderRequest {
            customer_id,
            items: lines
                .iter()
                .map(|(id, quantity)| OrderLine {
                    product_id: ProductId::from(*id),
                    quantity: *quantity,
                })
                .collect(),
            shipping_address: Self::address(),
            payment_method: method,
        }
    }

    async fn available(&self, product_id: &str) -> (u32, u32) {
        let item = self
            .inventory
            .item(&ProductId::from(product_id))
            .await
            .unwrap();
        (item.quantity, item.reserved_quantity)
    }
}

#[tokio::test]
async fn happy_path_confirms_order_across_all_ledgers() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();

    let order = h
        .coordinator
        .process_order(TestHarness::request(
            customer_id,
            &[("ITEM001", 2), ("ITEM002", 1)],
            PaymentMethod::Card,
        ))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.total_amount, Money::from_minor(2 * 80000 + 60000));

    let reservation = h
        .inventory
        .reservation(order.reservation_id.unwrap())
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);

    let payment = h.payments.payment(order.payment_id.unwrap()).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, order.total_amount);

    let shipment = h.shipping.shipment(order.shipment_id.unwrap()).await.unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Pending);
    assert_eq!(
        shipment.tracking_number,
        order.tracking_number.clone().unwrap()
    );

    // Confirmed stock is permanently removed; nothing stays reserved.
    assert_eq!(h.available("ITEM001").await, (48, 0));
    assert_eq!(h.available("ITEM002").await, (29, 0));
}

#[tokio::test]
async fn wallet_order_fails_fast_on_insufficient_balance() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();
    h.wallet
        .credit(customer_id, Money::from_minor(100000), "BANK_TRANSFER")
        .await
        .unwrap();

    // ITEM001 + ITEM002 totals 140000 against a 100000 balance.
    let err = h
        .coordinator
        .process_order(TestHarness::request(
            customer_id,
            &[("ITEM001", 1), ("ITEM002", 1)],
            PaymentMethod::Wallet,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SagaError::Payment(PaymentError::InsufficientFunds { .. })
    ));

    // The reservation step never ran.
    assert_eq!(h.available("ITEM001").await, (50, 0));
    assert_eq!(h.available("ITEM002").await, (30, 0));
    assert!(h.coordinator.orders_for_customer(customer_id).await.is_empty());
    assert_eq!(
        h.wallet.balance(customer_id).await.unwrap().balance,
        Money::from_minor(100000)
    );
}

#[tokio::test]
async fn shipment_failure_is_compensated_and_reported_as_root_cause() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();
    h.wallet
        .credit(customer_id, Money::from_minor(500000), "BANK_TRANSFER")
        .await
        .unwrap();

    let mut request = TestHarness::request(
        customer_id,
        &[("ITEM001", 1), ("ITEM002", 1)],
        PaymentMethod::Wallet,
    );
    request.shipping_address.postal_code = String::new();

    let err = h.coordinator.process_order(request).await.unwrap_err();
    // The shipping failure is the root cause even though the payment was
    // compensated too.
    assert!(matches!(
        err,
        SagaError::Shipping(ShippingError::Validation(_))
    ));

    let orders = h.coordinator.orders_for_customer(customer_id).await;
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.status, OrderStatus::Failed);
    assert!(order.failure_reason.as_deref().unwrap().contains("Shipping"));
    assert!(order.shipment_id.is_none());

    let reservation = h
        .inventory
        .reservation(order.reservation_id.unwrap())
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Cancelled);
    assert_eq!(h.available("ITEM001").await, (50, 0));
    assert_eq!(h.available("ITEM002").await, (30, 0));

    // Refund of the full 140000 was recorded and the wallet restored.
    let payment = h.payments.payment(order.payment_id.unwrap()).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Refunded);
    assert_eq!(
        h.wallet.balance(customer_id).await.unwrap().balance,
        Money::from_minor(500000)
    );
}

#[tokio::test]
async fn declined_card_cancels_reservation_and_keeps_failed_payment() {
    let h = TestHarness::new(Arc::new(DeclineAll)).await;
    let customer_id = CustomerId::new();

    let err = h
        .coordinator
        .process_order(TestHarness::request(
            customer_id,
            &[("ITEM001", 3)],
            PaymentMethod::Card,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SagaError::Payment(PaymentError::Declined { .. })
    ));

    // Reservation was cancelled and stock restored.
    assert_eq!(h.available("ITEM001").await, (50, 0));

    let orders = h.coordinator.orders_for_customer(customer_id).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Failed);
    let reservation = h
        .inventory
        .reservation(orders[0].reservation_id.unwrap())
        .await
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Cancelled);

    // The declined attempt is still auditable.
    let payments = h.payments.payments_for_customer(customer_id).await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Failed);
}

#[tokio::test]
async fn insufficient_stock_fails_before_any_mutation() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();

    // ITEM003 has only 8 available.
    let err = h
        .coordinator
        .process_order(TestHarness::request(
            customer_id,
            &[("ITEM001", 1), ("ITEM003", 20)],
            PaymentMethod::Card,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SagaError::Inventory(InventoryError::Insufficient { .. })
    ));

    assert_eq!(h.available("ITEM001").await, (50, 0));
    assert_eq!(h.available("ITEM003").await, (8, 0));
    assert!(h.coordinator.orders_for_customer(customer_id).await.is_empty());
}

#[tokio::test]
async fn compensated_payment_cannot_be_refunded_again() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();
    h.wallet
        .credit(customer_id, Money::from_minor(500000), "BANK_TRANSFER")
        .await
        .unwrap();

    let mut request =
        TestHarness::request(customer_id, &[("ITEM002", 1)], PaymentMethod::Wallet);
    request.shipping_address.city = String::new();
    h.coordinator.process_order(request).await.unwrap_err();

    let orders = h.coordinator.orders_for_customer(customer_id).await;
    let payment_id = orders[0].payment_id.unwrap();
    let err = h
        .payments
        .refund(payment_id, None, "manual retry")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PaymentError::InvalidState {
            status: PaymentStatus::Refunded
        }
    ));
}

#[tokio::test]
async fn consecutive_orders_share_the_ledgers() {
    let h = TestHarness::new(Arc::new(ApproveAll)).await;
    let customer_id = CustomerId::new();

    for _ in 0..3 {
        h.coordinator
            .process_order(TestHarness::request(
                customer_id,
                &[("ITEM002", 5)],
                PaymentMethod::Card,
            ))
            .await
            .unwrap();
    }
    assert_eq!(h.available("ITEM002").await, (15, 0));

    // A fourth order of 20 exceeds what is left.
    let err = h
        .coordinator
        .process_order(TestHarness::request(
            customer_id,
            &[("ITEM002", 20)],
            PaymentMethod::Card,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SagaError::Inventory(_)));

    let orders = h.coordinator.orders_for_customer(customer_id).await;
    assert_eq!(orders.len(), 3);
    assert!(orders.iter().all(|o| o.status == OrderStatus::Confirmed));
}
