//! UserService: registration and login over the Store
//!
//! `Register` hashes the password before it ever reaches the store; `Login`
//! never learns which of "no such user" and "wrong password" occurred —
//! both collapse to `WrongCredentials` so a caller can't enumerate logins.

use std::sync::Arc;

use domain::user::Credentials;
use store::error::StoreError;
use store::Store;

use crate::error::ServiceError;
use crate::password;

pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let password_hash = password::hash(&credentials.password).map_err(|e| match e {
            password::PasswordError::InvalidLength => ServiceError::InvalidPassword,
            other => ServiceError::Transient(anyhow::anyhow!(other)),
        })?;

        match self.store.create_user(&credentials.login, &password_hash).await {
            Ok(()) => Ok(()),
            Err(StoreError::Conflict) => Err(ServiceError::LoginTaken),
            Err(StoreError::Transient(e)) => Err(ServiceError::Transient(e)),
            Err(other) => Err(ServiceError::Transient(anyhow::anyhow!(other))),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let user = match self.store.get_user(&credentials.login).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(ServiceError::WrongCredentials),
            Err(StoreError::Transient(e)) => return Err(ServiceError::Transient(e)),
            Err(other) => return Err(ServiceError::Transient(anyhow::anyhow!(other))),
        };

        if password::verify(&credentials.password, &user.password_hash) {
            Ok(())
        } else {
            Err(ServiceError::WrongCredentials)
        }
    }
}
