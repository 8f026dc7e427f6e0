//! The conflict-carrying `Outcome` type.
//!
//! The domain error kinds (`LoginTaken`, `WrongCredentials`, ...)
//! are owned by each crate's own error enum at its seam —
//! `store::error::StoreError`, `services::error::ServiceError`,
//! `gateway::error::AppError` — rather than duplicated here, since the same
//! underlying condition (e.g. "no such row") means something different at
//! each call site (see `services::error` for why). What *is* shared across
//! crates is the shape of a create that can conflict with an existing row.

use crate::order::Order;

/// Outcome of an operation that can either succeed, conflict with an
/// existing row (carrying that row so the caller can decide what kind of
/// conflict it is), or fail transiently.
///
/// Used instead of a bare `Result<T, Error>` specifically where the
/// conflicting row's data is needed by the caller (`Store::CreateOrder`).
#[derive(Debug, Clone)]
pub enum Outcome<T, C> {
    Created(T),
    Conflict(C),
}

/// The conflict side of `Store::CreateOrder`: the already-existing row,
/// independent of which login now wins.
pub type CreateOrderOutcome = Outcome<(), Order>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_conflict_carries_existing_row() {
        use chrono::Utc;
        let existing = Order::new("owner", "12345678903", Utc::now());
        let outcome: CreateOrderOutcome = Outcome::Conflict(existing.clone());
        match outcome {
            Outcome::Conflict(o) => assert_eq!(o.login, existing.login),
            Outcome::Created(_) => panic!("expected conflict"),
        }
    }
}
