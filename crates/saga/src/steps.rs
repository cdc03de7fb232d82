//! Order fulfillment saga constants.

/// The saga type identifier for order fulfillment.
pub const SAGA_TYPE: &str = "OrderFulfillment";

/// Step name: Reserve inventory for the order.
pub const STEP_RESERVE_INVENTORY: &str = "reserve_inventory";

/// Step name: Charge the customer for the order.
pub const STEP_CHARGE_PAYMENT: &str = "charge_payment";

/// Step name: Create the shipment for the reserved items.
pub const STEP_CREATE_SHIPMENT: &str = "create_shipment";

/// Step name: Confirm the reservation, permanently removing stock.
pub const STEP_CONFIRM_RESERVATION: &str = "confirm_reservation";
