//! Withdrawal entity
//!
//! Append-only: a `Withdrawal` row is created only as part of the store's
//! atomic `WithdrawFromBalance` transaction, which also increments
//! `Balance.withdrawn` by the same `sum` (invariant P3).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::amount::Amount;

#[derive(Debug, Clone, Serialize)]
pub struct Withdrawal {
    pub login: String,
    pub order_number: String,
    pub sum: Amount,
    pub processed_at: DateTime<Utc>,
}

/// Wire shape for `GET /api/user/withdrawals`: `{"order","sum","processed_at"}`.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalResponse {
    pub order: String,
    pub sum: Amount,
    pub processed_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(w: Withdrawal) -> Self {
        Self {
            order: w.order_number,
            sum: w.sum,
            processed_at: w.processed_at,
        }
    }
}

/// Request body for `POST /api/user/balance/withdraw`: `{"order":"...","sum":N}`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WithdrawRequest {
    pub order: String,
    pub sum: Amount,
}
