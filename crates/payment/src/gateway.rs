//! Card authorization as an injectable decision function.
//!
//! The processor never decides card outcomes itself; it asks a
//! [`CardGateway`]. Production-like setups use [`RandomGateway`], tests use
//! the deterministic gateways to force either branch.

use async_trait::async_trait;
use common::{CustomerId, Money, OrderId};
use rand::Rng;

/// Decides whether a card charge is authorized.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// Returns true if the charge is approved.
    async fn authorize(&self, order_id: OrderId, customer_id: CustomerId, amount: Money) -> bool;
}

/// Gateway that approves every charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

#[async_trait]
impl CardGateway for ApproveAll {
    async fn authorize(&self, _: OrderId, _: CustomerId, _: Money) -> bool {
        true
    }
}

/// Gateway that declines every charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

#[async_trait]
impl CardGateway for DeclineAll {
    async fn authorize(&self, _: OrderId, _: CustomerId, _: Money) -> bool {
        false
    }
}

/// Simulated external gateway that approves a fixed fraction of charges.
#[derive(Debug, Clone, Copy)]
pub struct RandomGateway {
    approval_rate: f64,
}

impl RandomGateway {
    /// Creates a gateway approving the given fraction of charges.
    pub fn new(approval_rate: f64) -> Self {
        Self {
            approval_rate: approval_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for RandomGateway {
    /// The 90% approval rate of the simulated upstream gateway.
    fn default() -> Self {
        Self::new(0.9)
    }
}

#[async_trait]
impl CardGateway for RandomGateway {
    async fn authorize(&self, _: OrderId, _: CustomerId, _: Money) -> bool {
        rand::thread_rng().gen_bool(self.approval_rate)
    }
}
