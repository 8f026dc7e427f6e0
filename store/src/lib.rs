//! The transactional persistence layer for the loyalty accrual backend.
//!
//! `Store` is the only component allowed to begin transactions or observe
//! uniqueness violations; domain-level outcomes (conflict, insufficient
//! balance) are reported as distinct error kinds and are never retried,
//! while transient I/O errors are retried internally per [`retry`].

pub mod error;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;
use domain::balance::Balance;
use domain::errors::CreateOrderOutcome;
use domain::order::{Order, OrderAccrual};
use domain::user::User;
use domain::withdrawal::Withdrawal;

use crate::error::StoreError;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<(), StoreError>;

    async fn get_user(&self, login: &str) -> Result<User, StoreError>;

    async fn create_balance(&self, login: &str) -> Result<(), StoreError>;

    async fn create_order(&self, login: &str, number: &str) -> Result<CreateOrderOutcome, StoreError>;

    async fn list_orders(&self, login: &str) -> Result<Vec<Order>, StoreError>;

    /// Orders with status ∈ {NEW, PROCESSING}. Used only by the reconciler.
    async fn list_orders_to_process(&self) -> Result<Vec<Order>, StoreError>;

    async fn get_balance(&self, login: &str) -> Result<Balance, StoreError>;

    async fn list_withdrawals(&self, login: &str) -> Result<Vec<Withdrawal>, StoreError>;

    async fn withdraw_from_balance(
        &self,
        login: &str,
        order_number: &str,
        sum: domain::amount::Amount,
    ) -> Result<(), StoreError>;

    /// Atomically update an order's status/accrual and, if the order is
    /// transitioning into PROCESSED for the first time, increment the
    /// owning login's `Balance.accrued` by the delta. No-op if the order
    /// is already terminal (invariant I2).
    async fn update_balance_accrued(&self, order: &Order, accrual: &OrderAccrual) -> Result<(), StoreError>;
}
