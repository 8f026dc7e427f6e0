//! Store-level error taxonomy
//!
//! The store is the only layer allowed to observe uniqueness violations or
//! other raw driver errors; everything above it sees one of these variants,
//! never a `sqlx::Error` or a Postgres error code directly.

use domain::order::Order;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness violation on `users.login`.
    #[error("login already exists")]
    Conflict,

    /// A uniqueness violation on `orders.number`, carrying the row that
    /// already owns it so the service layer can tell same-login apart
    /// from other-login.
    #[error("order number already exists")]
    OrderConflict(Box<Order>),

    /// No matching row (`GetUser`). Not treated as an error by callers —
    /// a missing row is not itself an error condition.
    #[error("not found")]
    NotFound,

    /// `WithdrawFromBalance` observed `accrued - withdrawn < 0` after the
    /// debit and rolled back.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Backoff-exhausted I/O error. Never retried again above this layer.
    #[error("transient store failure: {0}")]
    Transient(#[source] anyhow::Error),
}
