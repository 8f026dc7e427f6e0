//! User entity
//!
//! Created by registration; never mutated afterwards, never deleted in
//! normal operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(login: impl Into<String>, password_hash: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            login: login.into(),
            password_hash: password_hash.into(),
            created_at,
        }
    }
}

/// Registration/login request body shape, shared by both endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_deserialize_from_json() {
        let json = r#"{"login":"u1","password":"p"}"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.login, "u1");
        assert_eq!(creds.password, "p");
    }
}
