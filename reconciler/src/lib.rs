//! The accrual reconciliation loop (C3).
//!
//! A long-lived task, started once at process startup, that polls the
//! external accrual service for unfinished orders every `TICK_INTERVAL` and
//! commits status/accrual updates through a bounded worker pool. Disabled
//! entirely in tests that don't need it by simply never spawning it.

pub mod client;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use store::Store;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use client::AccrualClient;

/// The reconciliation tick interval. 10 seconds, not 20.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Runs the reconciliation loop until `cancellation` is triggered. At most
/// one tick is ever in flight: if a tick's processing outlasts
/// `TICK_INTERVAL`, `tokio::time::interval`'s default `Burst` behavior would
/// double up, so we use `MissedTickBehavior::Delay` to coalesce instead.
pub async fn run(store: Arc<dyn Store>, accrual_base_url: String, cancellation: CancellationToken) {
    let client = AccrualClient::new(accrual_base_url);
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_one_tick(&client, &store).await {
                    warn!(error = %e, "reconciler tick failed to list candidate orders");
                }
            }
            _ = cancellation.cancelled() => {
                info!("reconciler shutting down");
                return;
            }
        }
    }
}

async fn run_one_tick(client: &AccrualClient, store: &Arc<dyn Store>) -> Result<(), store::error::StoreError> {
    let candidates = store.list_orders_to_process().await?;
    if candidates.is_empty() {
        return Ok(());
    }
    info!(count = candidates.len(), "reconciler tick starting");
    worker::run_tick(client.clone(), store.clone(), candidates).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::amount::Amount;
    use domain::balance::Balance;
    use domain::errors::CreateOrderOutcome;
    use domain::order::{Order, OrderAccrual};
    use domain::user::User;
    use domain::withdrawal::Withdrawal;
    use store::error::StoreError;

    struct EmptyStore;

    #[async_trait]
    impl Store for EmptyStore {
        async fn create_user(&self, _login: &str, _password_hash: &str) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn get_user(&self, _login: &str) -> Result<User, StoreError> {
            unimplemented!()
        }
        async fn create_balance(&self, _login: &str) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn create_order(&self, _login: &str, _number: &str) -> Result<CreateOrderOutcome, StoreError> {
            unimplemented!()
        }
        async fn list_orders(&self, _login: &str) -> Result<Vec<Order>, StoreError> {
            Ok(vec![])
        }
        async fn list_orders_to_process(&self) -> Result<Vec<Order>, StoreError> {
            Ok(vec![])
        }
        async fn get_balance(&self, _login: &str) -> Result<Balance, StoreError> {
            unimplemented!()
        }
        async fn list_withdrawals(&self, _login: &str) -> Result<Vec<Withdrawal>, StoreError> {
            Ok(vec![])
        }
        async fn withdraw_from_balance(&self, _login: &str, _order_number: &str, _sum: Amount) -> Result<(), StoreError> {
            unimplemented!()
        }
        async fn update_balance_accrued(&self, _order: &Order, _accrual: &OrderAccrual) -> Result<(), StoreError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop_without_waiting_for_a_tick() {
        let cancellation = CancellationToken::new();
        let store: Arc<dyn Store> = Arc::new(EmptyStore);

        let handle = tokio::spawn(run(store, "http://127.0.0.1:1".to_string(), cancellation.clone()));
        cancellation.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reconciler did not shut down promptly")
            .unwrap();
    }
}
