//! BalanceService: read and withdraw
//!
//! Mostly a pass-through over the store; the one piece of logic here is
//! validating the withdrawal's order number the same way an upload would,
//! before the store ever opens a transaction against it.

use std::sync::Arc;

use domain::amount::Amount;
use domain::balance::Balance;
use domain::luhn;
use domain::withdrawal::Withdrawal;
use store::error::StoreError;
use store::Store;

use crate::error::ServiceError;

pub struct BalanceService {
    store: Arc<dyn Store>,
}

impl BalanceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Invoked once, immediately after a successful registration (see the
    /// two-write composition sequence in [`crate::user::UserService::register`]'s
    /// caller).
    pub async fn create(&self, login: &str) -> Result<(), ServiceError> {
        match self.store.create_balance(login).await {
            Ok(()) => Ok(()),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }

    pub async fn get(&self, login: &str) -> Result<Balance, ServiceError> {
        match self.store.get_balance(login).await {
            Ok(balance) => Ok(balance),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }

    pub async fn withdraw(&self, login: &str, order_number: &str, sum: Amount) -> Result<(), ServiceError> {
        if !luhn::is_valid(order_number) {
            return Err(ServiceError::InvalidOrderNumber);
        }

        match self.store.withdraw_from_balance(login, order_number, sum).await {
            Ok(()) => Ok(()),
            Err(StoreError::InsufficientFunds) => Err(ServiceError::NotEnoughBalance),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }

    pub async fn withdrawals(&self, login: &str) -> Result<Vec<Withdrawal>, ServiceError> {
        match self.store.list_withdrawals(login).await {
            Ok(withdrawals) if withdrawals.is_empty() => Err(ServiceError::NoContent),
            Ok(withdrawals) => Ok(withdrawals),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }
}
