//! Wallet ledger owning per-customer prepaid balances.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use common::{CustomerId, Money};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CURRENCY;
use crate::error::PaymentError;

/// A customer's prepaid balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub customer_id: CustomerId,
    pub balance: Money,
    pub currency: String,
    pub last_updated: DateTime<Utc>,
}

/// Owns wallets and mutates them atomically.
///
/// Debit and credit take the write lock for their whole duration so the
/// balance check and the adjustment are one step; the balance never goes
/// negative.
#[derive(Debug, Clone, Default)]
pub struct WalletLedger {
    wallets: Arc<RwLock<HashMap<CustomerId, Wallet>>>,
}

impl WalletLedger {
    /// Creates an empty wallet ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of a customer's wallet.
    pub async fn balance(&self, customer_id: CustomerId) -> Result<Wallet, PaymentError> {
        self.wallets
            .read()
            .unwrap()
            .get(&customer_id)
            .cloned()
            .ok_or(PaymentError::WalletNotFound(customer_id))
    }

    /// Removes funds from a wallet.
    pub async fn debit(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> Result<Wallet, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let mut wallets = self.wallets.write().unwrap();
        let wallet = wallets
            .get_mut(&customer_id)
            .ok_or(PaymentError::WalletNotFound(customer_id))?;
        if wallet.balance < amount {
            return Err(PaymentError::InsufficientFunds {
                available: wallet.balance,
                required: amount,
            });
        }

        wallet.balance -= amount;
        wallet.last_updated = Utc::now();
        Ok(wallet.clone())
    }

    /// Adds funds to a wallet, creating it with a zero balance if absent.
    pub async fn credit(
        &self,
        customer_id: CustomerId,
        amount: Money,
        source: &str,
    ) -> Result<Wallet, PaymentError> {
        if !amount.is_positive() {
            return Err(PaymentError::Validation(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let mut wallets = self.wallets.write().unwrap();
        let wallet = wallets.entry(customer_id).or_insert_with(|| Wallet {
            customer_id,
            balance: Money::zero(),
            currency: DEFAULT_CURRENCY.to_string(),
            last_updated: Utc::now(),
        });
        wallet.balance += amount;
        wallet.last_updated = Utc::now();

        tracing::info!(%customer_id, %amount, source, "wallet credited");
        Ok(wallet.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn credit_creates_wallet_when_absent() {
        let ledger = WalletLedger::new();
        let customer = CustomerId::new();

        let wallet = ledger
            .credit(customer, Money::from_minor(500000), "BANK_TRANSFER")
            .await
            .unwrap();
        assert_eq!(wallet.balance, Money::from_minor(500000));
        assert_eq!(wallet.currency, DEFAULT_CURRENCY);

        let wallet = ledger.balance(customer).await.unwrap();
        assert_eq!(wallet.balance, Money::from_minor(500000));
    }

    #[tokio::test]
    async fn debit_reduces_balance() {
        let ledger = WalletLedger::new();
        let customer = CustomerId::new();
        ledger
            .credit(customer, Money::from_minor(300000), "BANK_TRANSFER")
            .await
            .unwrap();

        let wallet = ledger
            .debit(customer, Money::from_minor(140000))
            .await
            .unwrap();
        assert_eq!(wallet.balance, Money::from_minor(160000));
    }

    #[tokio::test]
    async fn debit_fails_on_insufficient_funds_without_mutation() {
        let ledger = WalletLedger::new();
        let customer = CustomerId::new();
        ledger
            .credit(customer, Money::from_minor(100000), "BANK_TRANSFER")
            .await
            .unwrap();

        let err = ledger
            .debit(customer, Money::from_minor(140000))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InsufficientFunds { .. }));

        let wallet = ledger.balance(customer).await.unwrap();
        assert_eq!(wallet.balance, Money::from_minor(100000));
    }

    #[tokio::test]
    async fn unknown_wallet_is_not_found() {
        let ledger = WalletLedger::new();
        let customer = CustomerId::new();

        let err = ledger.balance(customer).await.unwrap_err();
        assert!(matches!(err, PaymentError::WalletNotFound(_)));

        let err = ledger
            .debit(customer, Money::from_minor(100))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::WalletNotFound(_)));
    }

    #[tokio::test]
    async fn zero_and_negative_amounts_are_rejected() {
        let ledger = WalletLedger::new();
        let customer = CustomerId::new();

        let err = ledger
            .credit(customer, Money::zero(), "BANK_TRANSFER")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));

        let err = ledger
            .credit(customer, Money::from_minor(-5), "BANK_TRANSFER")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));

        ledger
            .credit(customer, Money::from_minor(100), "BANK_TRANSFER")
            .await
            .unwrap();
        let err = ledger.debit(customer, Money::zero()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
    }
}
