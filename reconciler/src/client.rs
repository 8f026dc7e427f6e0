//! HTTP client for the external accrual service.
//!
//! One GET per order, wrapped in the same backoff policy the store uses for
//! its own I/O. A 429 is treated as transient like any other
//! non-2xx response — the accrual service's rate limiting is absorbed here,
//! not surfaced to the caller.

use std::time::Duration;

use backoff::ExponentialBackoff;
use domain::order::OrderAccrual;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("accrual request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("accrual response decode failed: {0}")]
    Decode(anyhow::Error),
}

fn policy() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        multiplier: 1.5,
        max_elapsed_time: Some(Duration::from_secs(15 * 60)),
        ..ExponentialBackoff::default()
    }
}

#[derive(Clone)]
pub struct AccrualClient {
    http: reqwest::Client,
    base_url: String,
}

impl AccrualClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// `GET {base}/api/orders/{number}`, retried per the policy above.
    pub async fn fetch(&self, number: &str) -> Result<OrderAccrual, ClientError> {
        let url = format!("{}/api/orders/{number}", self.base_url.trim_end_matches('/'));

        backoff::future::retry(policy(), || async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(ClientError::Request(e)))?;

            if response.status().is_server_error() || response.status().as_u16() == 429 {
                return Err(backoff::Error::transient(ClientError::Decode(anyhow::anyhow!(
                    "accrual service returned {}",
                    response.status()
                ))));
            }

            if !response.status().is_success() {
                return Err(backoff::Error::permanent(ClientError::Decode(anyhow::anyhow!(
                    "accrual service returned {}",
                    response.status()
                ))));
            }

            response
                .json::<OrderAccrual>()
                .await
                .map_err(|e| backoff::Error::permanent(ClientError::Request(e)))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_decodes_a_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/2377225624"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order": "2377225624",
                "status": "PROCESSED",
                "accrual": 750,
            })))
            .mount(&server)
            .await;

        let client = AccrualClient::new(server.uri());
        let accrual = client.fetch("2377225624").await.unwrap();
        assert_eq!(accrual.order, "2377225624");
        assert_eq!(accrual.accrual_amount().as_decimal(), rust_decimal::Decimal::from(750));
    }

    #[tokio::test]
    async fn fetch_surfaces_a_client_error_without_retrying_forever() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/unknown"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AccrualClient::new(server.uri());
        assert!(client.fetch("unknown").await.is_err());
    }
}
