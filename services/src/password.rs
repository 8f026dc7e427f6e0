//! Password hashing
//!
//! Argon2id with a per-password random salt. Passwords over 72 bytes are
//! rejected up front with a distinct error kind rather than silently
//! truncated or left to fail deep inside the hashing call.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Matches bcrypt's 72-byte input limit, kept as the documented boundary
/// regardless of which bcrypt-class hash is used.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be between 1 and {MAX_PASSWORD_BYTES} bytes")]
    InvalidLength,

    #[error("password hashing failed: {0}")]
    HashingFailed(String),
}

pub fn hash(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::InvalidLength);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hashed = hash("hunter2").unwrap();
        assert!(verify("hunter2", &hashed));
        assert!(!verify("wrong", &hashed));
    }

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(hash(""), Err(PasswordError::InvalidLength)));
    }

    #[test]
    fn rejects_password_over_72_bytes() {
        let long = "a".repeat(73);
        assert!(matches!(hash(&long), Err(PasswordError::InvalidLength)));
    }

    #[test]
    fn accepts_password_at_72_bytes() {
        let boundary = "a".repeat(72);
        assert!(hash(&boundary).is_ok());
    }

    #[test]
    fn two_hashes_of_same_password_differ_by_salt() {
        let a = hash("samepassword").unwrap();
        let b = hash("samepassword").unwrap();
        assert_ne!(a, b);
    }
}
