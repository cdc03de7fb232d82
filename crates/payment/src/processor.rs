//! Payment processor owning payment and refund records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, PaymentId, RefundId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PaymentError;
use crate::gateway::CardGateway;
use crate::wallet::WalletLedger;

/// How a payment is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// External card authorization through the gateway.
    Card,
    /// Debit against the customer's prepaid wallet.
    Wallet,
}

impl PaymentMethod {
    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Wallet => "WALLET",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a payment.
///
/// Status transitions:
/// ```text
/// Completed ──► Refunded
/// Failed (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The charge went through.
    Completed,
    /// The charge was declined or funds were insufficient (terminal).
    Failed,
    /// The completed payment was refunded (terminal).
    Refunded,
}

impl PaymentStatus {
    /// Returns true if the payment can be refunded.
    pub fn can_refund(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub processed_at: DateTime<Utc>,
    pub refunded_at: Option<DateTime<Utc>>,
}

/// A recorded refund against a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub refund_id: RefundId,
    pub payment_id: PaymentId,
    pub amount: Money,
    pub reason: String,
    pub transaction_id: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ProcessorState {
    payments: HashMap<PaymentId, Payment>,
    refunds: HashMap<RefundId, Refund>,
}

/// Records payments and refunds, delegating funding decisions.
///
/// Wallet charges debit the wallet ledger; card charges ask the injected
/// gateway. Declined card charges still leave a `Failed` payment record so
/// the attempt is auditable.
#[derive(Clone)]
pub struct PaymentProcessor {
    wallet: WalletLedger,
    gateway: Arc<dyn CardGateway>,
    state: Arc<RwLock<ProcessorState>>,
}

impl PaymentProcessor {
    /// Creates a processor over the given wallet ledger and card gateway.
    pub fn new(wallet: WalletLedger, gateway: Arc<dyn CardGateway>) -> Self {
        Self {
            wallet,
            gateway,
            state: Arc::new(RwLock::new(ProcessorState::default())),
        }
    }

    /// Returns the wallet ledger this processor debits.
    pub fn wallet(&self) -> &WalletLedger {
        &self.wallet
    }

    /// Charges a customer for an order.
    pub async fn charge(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
        amount: Money,
        method: PaymentMethod,
        currency: &str,
    ) -> Result<Payment, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }

        match method {
            PaymentMethod::Wallet => {
                // Insufficient funds propagates; no payment record is kept
                // for a wallet debit that never happened.
                self.wallet.debit(customer_id, amount).await?;
            }
            PaymentMethod::Card => {
                let approved = self
                    .gateway
                    .authorize(order_id, customer_id, amount)
                    .await;
                if !approved {
                    let payment = self.record(
                        order_id,
                        customer_id,
                        amount,
                        currency,
                        method,
                        PaymentStatus::Failed,
                    );
                    tracing::warn!(payment_id = %payment.payment_id, %order_id, "card charge declined");
                    return Err(PaymentError::Declined {
                        payment_id: payment.payment_id,
                    });
                }
            }
        }

        let payment = self.record(
            order_id,
            customer_id,
            amount,
            currency,
            method,
            PaymentStatus::Completed,
        );
        Ok(payment)
    }

    /// Refunds a completed payment, fully by default.
    ///
    /// Wallet payments are credited back to the wallet.
    pub async fn refund(
        &self,
        payment_id: PaymentId,
        amount: Option<Money>,
        reason: &str,
    ) -> Result<Refund, PaymentError> {
        if reason.trim().is_empty() {
            return Err(PaymentError::Validation(
                "Refund reason is required".to_string(),
            ));
        }

        let (refund, method, customer_id) = {
            let mut guard = self.state.write().unwrap();
            let state = &mut *guard;
            let payment = state
                .payments
                .get_mut(&payment_id)
                .ok_or(PaymentError::PaymentNotFound(payment_id))?;
            if !payment.status.can_refund() {
                return Err(PaymentError::InvalidState {
                    status: payment.status,
                });
            }

            let amount = amount.unwrap_or(payment.amount);
            if !amount.is_positive() || amount > payment.amount {
                return Err(PaymentError::Validation(format!(
                    "Invalid refund amount. Must be between 0 and {}",
                    payment.amount
                )));
            }

            let now = Utc::now();
            payment.status = PaymentStatus::Refunded;
            payment.refunded_at = Some(now);

            let refund = Refund {
                refund_id: RefundId::new(),
                payment_id,
                amount,
                reason: reason.to_string(),
                transaction_id: format!("REF-{}", Uuid::new_v4().simple()),
                processed_at: now,
            };
            state.refunds.insert(refund.refund_id, refund.clone());
            (refund, payment.method, payment.customer_id)
        };

        if method == PaymentMethod::Wallet {
            self.wallet
                .credit(customer_id, refund.amount, "REFUND")
                .await?;
        }

        tracing::info!(%payment_id, refund_id = %refund.refund_id, amount = %refund.amount, "payment refunded");
        Ok(refund)
    }

    /// Returns a snapshot of a payment.
    pub async fn payment(&self, payment_id: PaymentId) -> Result<Payment, PaymentError> {
        self.state
            .read()
            .unwrap()
            .payments
            .get(&payment_id)
            .cloned()
            .ok_or(PaymentError::PaymentNotFound(payment_id))
    }

    /// Returns all payments recorded for a customer, oldest first.
    pub async fn payments_for_customer(&self, customer_id: CustomerId) -> Vec<Payment> {
        let state = self.state.read().unwrap();
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.customer_id == customer_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.processed_at);
        payments
    }

    fn record(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
        amount: Money,
        currency: &str,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Payment {
        let payment = Payment {
            payment_id: PaymentId::new(),
            order_id,
            customer_id,
            amount,
            currency: currency.to_string(),
            method,
            status,
            transaction_id: format!("TXN-{}", Uuid::new_v4().simple()),
            processed_at: Utc::now(),
            refunded_at: None,
        };
        self.state
            .write()
            .unwrap()
            .payments
            .insert(payment.payment_id, payment.clone());
        payment
    }
}
