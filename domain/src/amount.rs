//! Non-negative fixed-precision decimal amounts
//!
//! All monetary/points quantities in the system (balances, accruals,
//! withdrawal sums) are non-negative. `Amount` wraps `rust_decimal::Decimal`
//! and rejects negative values at construction, so a negative amount can
//! never silently enter a transaction.

use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative decimal quantity of loyalty points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

/// Error returned when attempting to construct an `Amount` from a negative decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount must be non-negative, got {0}")]
pub struct NegativeAmount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Construct an `Amount`, rejecting negative values.
    pub fn try_new(value: Decimal) -> Result<Self, NegativeAmount> {
        if value.is_sign_negative() && !value.is_zero() {
            Err(NegativeAmount(value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Saturating subtraction: `current - other`, clamped to zero.
    ///
    /// Used only for display/derivation, never for the store's balance
    /// arithmetic, which must reject negative results outright rather than
    /// clamp them (see `Balance::current`).
    pub fn saturating_sub(self, other: Amount) -> Amount {
        let diff = self.0 - other.0;
        if diff.is_sign_negative() {
            Amount::ZERO
        } else {
            Amount(diff)
        }
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = NegativeAmount;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::try_new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

/// Subtraction is only exposed as a `Result` since the difference of two
/// non-negative amounts can be negative; callers must handle that case
/// (this is the balance non-negativity invariant: accrued - withdrawn >= 0).
impl Sub for Amount {
    type Output = Result<Amount, NegativeAmount>;

    fn sub(self, rhs: Amount) -> Result<Amount, NegativeAmount> {
        Amount::try_new(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_negative() {
        assert!(Amount::try_new(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn accepts_zero_and_positive() {
        assert!(Amount::try_new(Decimal::ZERO).is_ok());
        assert!(Amount::try_new(Decimal::new(750, 0)).is_ok());
    }

    #[test]
    fn subtraction_below_zero_errors() {
        let ten = Amount::try_new(Decimal::new(10, 0)).unwrap();
        let twenty = Amount::try_new(Decimal::new(20, 0)).unwrap();
        assert!((ten - twenty).is_err());
        assert!((twenty - ten).is_ok());
    }

    #[test]
    fn saturating_sub_clamps_to_zero() {
        let ten = Amount::try_new(Decimal::new(10, 0)).unwrap();
        let twenty = Amount::try_new(Decimal::new(20, 0)).unwrap();
        assert_eq!(ten.saturating_sub(twenty), Amount::ZERO);
    }

    proptest! {
        #[test]
        fn sum_of_non_negative_is_non_negative(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let x = Amount::try_new(Decimal::new(a, 2)).unwrap();
            let y = Amount::try_new(Decimal::new(b, 2)).unwrap();
            prop_assert!((x + y).as_decimal() >= Decimal::ZERO);
        }
    }
}
