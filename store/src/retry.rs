//! Exponential backoff wrapping for Store operations
//!
//! Every Store operation wraps its database call in this policy: initial
//! interval ≈500ms, multiplier ≈1.5, max elapsed time ≈15 minutes.
//! Domain-typed outcomes (conflict, insufficient balance, not found)
//! short-circuit out of the backoff immediately via `backoff::Error::Permanent`
//! — only genuinely transient I/O errors are retried.

use std::time::Duration;

use backoff::ExponentialBackoff;

use crate::error::StoreError;

fn policy() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        multiplier: 1.5,
        max_elapsed_time: Some(Duration::from_secs(15 * 60)),
        ..ExponentialBackoff::default()
    }
}

/// Run `op`, retrying on `Err(backoff::Error::Transient { .. })` per the
/// policy above. `op` classifies its own failures: a uniqueness violation
/// or other non-retryable condition must be returned as
/// `backoff::Error::permanent(..)`.
pub async fn with_retry<T, F, Fut>(op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, backoff::Error<StoreError>>>,
{
    backoff::future::retry(policy(), op).await.map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    })
}

/// Classify a raw `sqlx::Error` into either a permanent `StoreError` (a
/// uniqueness violation the caller already knows how to handle) or a
/// transient one eligible for backoff.
pub fn classify(err: sqlx::Error) -> backoff::Error<StoreError> {
    if let sqlx::Error::Database(ref db_err) = err {
        // Postgres unique_violation is SQLSTATE 23505.
        if db_err.code().as_deref() == Some("23505") {
            return backoff::Error::permanent(StoreError::Conflict);
        }
    }
    backoff::Error::transient(StoreError::Transient(anyhow::Error::new(err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_until_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(|| async {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(backoff::Error::transient(StoreError::Transient(anyhow::anyhow!("boom"))))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_short_circuits_without_retry() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), StoreError> = with_retry(|| async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(backoff::Error::permanent(StoreError::InsufficientFunds))
        })
        .await;
        assert!(matches!(result, Err(StoreError::InsufficientFunds)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
