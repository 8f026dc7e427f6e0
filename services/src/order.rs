//! OrderService: upload and listing
//!
//! Order number validity (Luhn) is checked here, before the store is ever
//! touched — the store has no notion of what makes a number well-formed,
//! only whether it's already taken.

use std::sync::Arc;

use domain::errors::Outcome;
use domain::luhn;
use domain::order::Order;
use store::error::StoreError;
use store::Store;

use crate::error::ServiceError;

pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Returns `Ok(true)` if this upload registered a new order, `Ok(false)`
    /// if this login had already uploaded the same number (idempotent repeat
    /// upload, 200 not 202 at the edge).
    pub async fn upload(&self, login: &str, number: &str) -> Result<bool, ServiceError> {
        if !luhn::is_valid(number) {
            return Err(ServiceError::InvalidOrderNumber);
        }

        match self.store.create_order(login, number).await {
            Ok(Outcome::Created(())) => Ok(true),
            Ok(Outcome::Conflict(existing)) => {
                if existing.login == login {
                    Ok(false)
                } else {
                    Err(ServiceError::UploadedByAnotherLogin)
                }
            }
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }

    pub async fn list_for_login(&self, login: &str) -> Result<Vec<Order>, ServiceError> {
        match self.store.list_orders(login).await {
            Ok(orders) if orders.is_empty() => Err(ServiceError::NoContent),
            Ok(orders) => Ok(orders),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }
}
