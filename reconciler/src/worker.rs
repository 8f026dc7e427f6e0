//! The bounded worker pool that drives a single tick.
//!
//! Exactly `WORKERS` workers consume from a job channel sized to the
//! candidate set and each signal completion on a done channel of the same
//! capacity — the tick function returns only once every order it handed out
//! has been accounted for.

use std::sync::Arc;

use domain::order::Order;
use store::Store;
use tokio::sync::mpsc;
use tracing::warn;

use crate::client::AccrualClient;

pub const WORKERS: usize = 3;

/// Runs one reconciliation pass over `candidates`, spawning exactly
/// [`WORKERS`] workers. Returns once every candidate has been processed
/// (successfully updated, left unchanged, or dropped on a per-order
/// failure — all three count as "done").
pub async fn run_tick(client: AccrualClient, store: Arc<dyn store::Store>, candidates: Vec<Order>) {
    let total = candidates.len();
    if total == 0 {
        return;
    }

    let (job_tx, job_rx) = mpsc::channel::<Order>(total);
    let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));
    let (done_tx, mut done_rx) = mpsc::channel::<()>(total);

    for order in candidates {
        // Capacity is exactly `total`, so this can never block.
        let _ = job_tx.send(order).await;
    }
    drop(job_tx);

    let mut workers = Vec::with_capacity(WORKERS);
    for _ in 0..WORKERS {
        let job_rx = job_rx.clone();
        let done_tx = done_tx.clone();
        let client = client.clone();
        let store = store.clone();
        workers.push(tokio::spawn(async move {
            loop {
                let order = {
                    let mut rx = job_rx.lock().await;
                    rx.recv().await
                };
                let Some(order) = order else { break };
                process_one(&client, store.as_ref(), order).await;
                let _ = done_tx.send(()).await;
            }
        }));
    }
    drop(done_tx);

    for _ in 0..total {
        let _ = done_rx.recv().await;
    }

    for worker in workers {
        let _ = worker.await;
    }
}

async fn process_one(client: &AccrualClient, store: &dyn store::Store, order: Order) {
    let accrual = match client.fetch(&order.number).await {
        Ok(accrual) => accrual,
        Err(e) => {
            warn!(order = %order.number, error = %e, "accrual fetch failed, retrying next tick");
            return;
        }
    };

    if accrual.canonical_status() == order.status && accrual.accrual_amount() == order.accrual {
        return;
    }

    if let Err(e) = store.update_balance_accrued(&order, &accrual).await {
        warn!(order = %order.number, error = %e, "balance update failed, retrying next tick");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::amount::Amount;
    use domain::balance::Balance;
    use domain::errors::CreateOrderOutcome;
    use domain::order::OrderAccrual;
    use domain::user::User;
    use domain::withdrawal::Withdrawal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use store::error::StoreError;
    use store::Store;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct RecordingStore {
        updates: StdMutex<Vec<String>>,
        max_concurrent: AtomicUsize,
        in_flight: AtomicUsize,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                updates: StdMutex::new(vec![]),
                max_concurrent: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Store for RecordingStore {
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
        async fn update_balance_accrued(&self, order: &Order, _accrual: &OrderAccrual) -> Result<(), StoreError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrent.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.updates.lock().unwrap().push(order.number.clone());
            Ok(())
        }
    }

    fn order(number: &str) -> Order {
        Order::new("u1", number, chrono::Utc::now())
    }

    #[tokio::test]
    async fn tick_updates_orders_whose_reported_state_differs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order": "n",
                "status": "PROCESSED",
                "accrual": 750,
            })))
            .mount(&server)
            .await;

        let client = AccrualClient::new(server.uri());
        let store = Arc::new(RecordingStore::new());
        let candidates = vec![order("1"), order("2"), order("3"), order("4"), order("5")];

        run_tick(client, store.clone(), candidates).await;

        assert_eq!(store.updates.lock().unwrap().len(), 5);
        assert!(store.max_concurrent.load(Ordering::SeqCst) <= WORKERS);
    }

    #[tokio::test]
    async fn tick_is_a_no_op_when_reported_state_matches_local_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order": "n",
                "status": "PROCESSING",
                "accrual": serde_json::Value::Null,
            })))
            .mount(&server)
            .await;

        let client = AccrualClient::new(server.uri());
        let store = Arc::new(RecordingStore::new());
        let mut o = order("1");
        o.status = domain::order::OrderStatus::Processing;
        run_tick(client, store.clone(), vec![o]).await;

        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_candidate_set_completes_immediately() {
        let client = AccrualClient::new("http://127.0.0.1:1");
        let store = Arc::new(RecordingStore::new());
        run_tick(client, store.clone(), vec![]).await;
        assert!(store.updates.lock().unwrap().is_empty());
    }
}
