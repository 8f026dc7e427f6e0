use std::sync::Arc;

use services::{BalanceService, OrderService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub order_service: Arc<OrderService>,
    pub balance_service: Arc<BalanceService>,
    pub secret_key: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn store::Store>, secret_key: impl Into<Arc<str>>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(store.clone())),
            order_service: Arc::new(OrderService::new(store.clone())),
            balance_service: Arc::new(BalanceService::new(store)),
            secret_key: secret_key.into(),
        }
    }
}
