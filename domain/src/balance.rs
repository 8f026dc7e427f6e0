//! Balance entity
//!
//! One balance row per login, created atomically alongside (or immediately
//! after) the user. `current = accrued - withdrawn` is a derived view, never
//! stored. Invariant B1: `accrued - withdrawn >= 0` after every committed
//! transaction — enforced by the store's `WithdrawFromBalance` transaction,
//! not by this type (which only models the already-committed state).

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub login: String,
    pub accrued: Amount,
    pub withdrawn: Amount,
}

impl Balance {
    pub fn zero(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            accrued: Amount::ZERO,
            withdrawn: Amount::ZERO,
        }
    }

    /// Derived current balance. Saturates at zero only as a defensive
    /// display fallback — the store never allows `accrued < withdrawn` to
    /// be committed in the first place.
    pub fn current(&self) -> Amount {
        self.accrued.saturating_sub(self.withdrawn)
    }
}

/// Wire shape for `GET /api/user/balance`: `{"current":...,"withdrawn":...}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BalanceResponse {
    pub current: Amount,
    pub withdrawn: Amount,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            current: balance.current(),
            withdrawn: balance.withdrawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn zero_balance_has_zero_current() {
        let balance = Balance::zero("u1");
        assert_eq!(balance.current(), Amount::ZERO);
    }

    #[test]
    fn current_is_accrued_minus_withdrawn() {
        let balance = Balance {
            login: "u1".to_string(),
            accrued: Amount::try_new(Decimal::new(500, 1)).unwrap(),
            withdrawn: Amount::try_new(Decimal::new(200, 1)).unwrap(),
        };
        assert_eq!(balance.current(), Amount::try_new(Decimal::new(300, 1)).unwrap());
    }
}
