//! Order lifecycle types
//!
//! An `Order` is created by a user upload and advances through status
//! transitions driven exclusively by the accrual reconciler. `login` is set
//! once at creation and never mutated afterwards (invariant I1); `status`
//! and `accrual` move only forward, and never out of a terminal status
//! (invariant I2 / P4).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Canonical order status as surfaced to clients.
///
/// `REGISTERED`, the external accrual service's initial status, is never
/// exposed here — it is mapped to `Processing` on ingestion (see
/// `OrderAccrual::canonical_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl OrderStatus {
    /// Terminal statuses suppress further reconciliation (invariant I2).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::Processed)
    }

    /// Whether this status belongs to the reconciler's candidate set
    /// (`ListOrdersToProcess`: status ∈ {NEW, PROCESSING}).
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::Processing)
    }
}

/// An uploaded order, owned by exactly one login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub login: String,
    pub number: String,
    pub status: OrderStatus,
    pub accrual: Amount,
    pub uploaded_at: DateTime<Utc>,
}

impl Order {
    pub fn new(login: impl Into<String>, number: impl Into<String>, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            login: login.into(),
            number: number.into(),
            status: OrderStatus::New,
            accrual: Amount::ZERO,
            uploaded_at,
        }
    }
}

/// Wire shape for `GET /api/user/orders`: `{"number","status","accrual","uploaded_at"}`.
/// `accrual` is omitted entirely unless the order is `PROCESSED`, matching
/// the external accrual contract's "field may be absent" convention.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub number: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Amount>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let accrual = matches!(order.status, OrderStatus::Processed).then_some(order.accrual);
        Self {
            number: order.number,
            status: order.status,
            accrual,
            uploaded_at: order.uploaded_at,
        }
    }
}

/// Status reported by the external accrual service. `Registered` only ever
/// appears here, transiently, before being folded into `Processing` for
/// internal purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

impl AccrualStatus {
    pub fn canonical(self) -> OrderStatus {
        match self {
            AccrualStatus::Registered => OrderStatus::Processing,
            AccrualStatus::Processing => OrderStatus::Processing,
            AccrualStatus::Invalid => OrderStatus::Invalid,
            AccrualStatus::Processed => OrderStatus::Processed,
        }
    }
}

/// Transient response body from `GET {base}/api/orders/{number}`. Never
/// persisted as its own row; mapped onto `Order` by the reconciler.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAccrual {
    pub order: String,
    pub status: AccrualStatus,
    #[serde(default)]
    pub accrual: Option<Amount>,
}

impl OrderAccrual {
    pub fn canonical_status(&self) -> OrderStatus {
        self.status.canonical()
    }

    pub fn accrual_amount(&self) -> Amount {
        self.accrual.unwrap_or(Amount::ZERO)
    }
}
