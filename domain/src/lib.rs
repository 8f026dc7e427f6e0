//! Core type definitions for the loyalty accrual backend
//!
//! This library provides the entities shared by the `store`, `services`,
//! `reconciler`, and `gateway` crates. It performs no I/O: everything here
//! is pure data and pure functions.
//!
//! # Modules
//! - `amount`: non-negative fixed-precision decimal wrapper
//! - `user`: `User` entity
//! - `order`: `Order`, `OrderStatus`, `OrderAccrual` entities
//! - `balance`: `Balance` entity
//! - `withdrawal`: `Withdrawal` entity
//! - `luhn`: order number checksum validation
//! - `errors`: the conflict-carrying `Outcome` type

pub mod amount;
pub mod balance;
pub mod errors;
pub mod luhn;
pub mod order;
pub mod user;
pub mod withdrawal;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::amount::*;
    pub use crate::balance::*;
    pub use crate::errors::*;
    pub use crate::luhn::*;
    pub use crate::order::*;
    pub use crate::user::*;
    pub use crate::withdrawal::*;
}
