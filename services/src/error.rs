//! Service-level error taxonomy
//!
//! Translates `StoreError` into the domain kinds the HTTP edge maps to
//! status codes. Each service method performs its own translation rather
//! than going through a single blanket conversion, because the same
//! `StoreError::NotFound` means "wrong credentials" from `Login` but
//! "balance row missing" from `Get` — the meaning is call-site dependent,
//! never re-wraps a domain-typed store error (`Conflict`,
//! `InsufficientFunds`, ...) as `Transient`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("login already taken")]
    LoginTaken,

    #[error("wrong login or password")]
    WrongCredentials,

    #[error("order already uploaded by this login")]
    UploadedByThisLogin,

    #[error("order already uploaded by another login")]
    UploadedByAnotherLogin,

    #[error("invalid order number")]
    InvalidOrderNumber,

    /// 400 — password is empty or exceeds the 72-byte bcrypt-class limit.
    /// Surfaced distinctly from `Transient` so the edge never turns a
    /// boundary violation into an opaque 500 (see DESIGN.md).
    #[error("password must be between 1 and 72 bytes")]
    InvalidPassword,

    #[error("insufficient balance")]
    NotEnoughBalance,

    #[error("no content")]
    NoContent,

    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}
