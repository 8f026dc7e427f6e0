//! Postgres implementation of [`crate::Store`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::amount::Amount;
use domain::balance::Balance;
use domain::errors::{CreateOrderOutcome, Outcome};
use domain::order::{Order, OrderAccrual, OrderStatus};
use domain::user::User;
use domain::withdrawal::Withdrawal;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StoreError;
use crate::retry::{self, with_retry};

/// Mirrors the `order_status` SQL enum. Kept separate from
/// `domain::order::OrderStatus` so the domain crate stays free of any I/O
/// or driver dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "UPPERCASE")]
enum DbOrderStatus {
    New,
    Processing,
    Invalid,
    Processed,
}

impl From<DbOrderStatus> for OrderStatus {
    fn from(s: DbOrderStatus) -> Self {
        match s {
            DbOrderStatus::New => OrderStatus::New,
            DbOrderStatus::Processing => OrderStatus::Processing,
            DbOrderStatus::Invalid => OrderStatus::Invalid,
            DbOrderStatus::Processed => OrderStatus::Processed,
        }
    }
}

impl From<OrderStatus> for DbOrderStatus {
    fn from(s: OrderStatus) -> Self {
        match s {
            OrderStatus::New => DbOrderStatus::New,
            OrderStatus::Processing => DbOrderStatus::Processing,
            OrderStatus::Invalid => DbOrderStatus::Invalid,
            OrderStatus::Processed => DbOrderStatus::Processed,
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to `database_uri`, applying embedded migrations before
    /// returning: connect, then migrate, then hand the pool to the rest
    /// of the application.
    pub async fn connect(database_uri: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_uri)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_order(login: String, number: String, status: DbOrderStatus, accrual: Decimal, uploaded_at: DateTime<Utc>) -> Order {
    Order {
        login,
        number,
        status: status.into(),
        accrual: Amount::try_new(accrual).unwrap_or(Amount::ZERO),
        uploaded_at,
    }
}

#[async_trait]
impl crate::Store for PgStore {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        let password_hash = password_hash.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            let password_hash = password_hash.clone();
            async move {
                sqlx::query("INSERT INTO users (login, password) VALUES ($1, $2)")
                    .bind(&login)
                    .bind(&password_hash)
                    .execute(&pool)
                    .await
                    .map(|_| ())
                    .map_err(retry::classify)
            }
        })
        .await
    }

    async fn get_user(&self, login: &str) -> Result<User, StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            async move {
                let row = sqlx::query("SELECT login, password, created_at FROM users WHERE login = $1")
                    .bind(&login)
                    .fetch_optional(&pool)
                    .await
                    .map_err(retry::classify)?;

                match row {
                    Some(row) => Ok(User {
                        login: row.get("login"),
                        password_hash: row.get("password"),
                        created_at: row.get("created_at"),
                    }),
                    None => Err(backoff::Error::permanent(StoreError::NotFound)),
                }
            }
        })
        .await
    }

    /// Idempotent by design: registration's second write, so a retry
    /// after a partial failure (or a first balance read racing a slow
    /// registration) must not surface a conflict.
    async fn create_balance(&self, login: &str) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            async move {
                sqlx::query(
                    "INSERT INTO balance (login, accrued, withdrawn) VALUES ($1, 0, 0) \
                     ON CONFLICT (login) DO NOTHING",
                )
                .bind(&login)
                .execute(&pool)
                .await
                .map(|_| ())
                .map_err(retry::classify)
            }
        })
        .await
    }

    async fn create_order(&self, login: &str, number: &str) -> Result<CreateOrderOutcome, StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        let number = number.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            let number = number.clone();
            async move {
                let inserted = sqlx::query(
                    "INSERT INTO orders (login, number) VALUES ($1, $2) ON CONFLICT (number) DO NOTHING",
                )
                .bind(&login)
                .bind(&number)
                .execute(&pool)
                .await
                .map_err(retry::classify)?;

                if inserted.rows_affected() == 1 {
                    return Ok(Outcome::Created(()));
                }

                // Conflict: fetch the existing row so the caller can tell
                // same-login from other-login.
                let row = sqlx::query(
                    "SELECT login, number, status, accrual, uploaded_at FROM orders WHERE number = $1",
                )
                .bind(&number)
                .fetch_one(&pool)
                .await
                .map_err(retry::classify)?;

                let existing = row_to_order(
                    row.get("login"),
                    row.get("number"),
                    row.get("status"),
                    row.get("accrual"),
                    row.get("uploaded_at"),
                );
                Ok(Outcome::Conflict(existing))
            }
        })
        .await
    }

    async fn list_orders(&self, login: &str) -> Result<Vec<Order>, StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            async move {
                let rows = sqlx::query(
                    "SELECT login, number, status, accrual, uploaded_at FROM orders \
                     WHERE login = $1 ORDER BY uploaded_at DESC",
                )
                .bind(&login)
                .fetch_all(&pool)
                .await
                .map_err(retry::classify)?;

                Ok(rows
                    .into_iter()
                    .map(|row| row_to_order(row.get("login"), row.get("number"), row.get("status"), row.get("accrual"), row.get("uploaded_at")))
                    .collect())
            }
        })
        .await
    }

    async fn list_orders_to_process(&self) -> Result<Vec<Order>, StoreError> {
        let pool = self.pool.clone();
        with_retry(|| {
            let pool = pool.clone();
            async move {
                let rows = sqlx::query(
                    "SELECT login, number, status, accrual, uploaded_at FROM orders \
                     WHERE status IN ('NEW', 'PROCESSING') ORDER BY uploaded_at ASC",
                )
                .fetch_all(&pool)
                .await
                .map_err(retry::classify)?;

                Ok(rows
                    .into_iter()
                    .map(|row| row_to_order(row.get("login"), row.get("number"), row.get("status"), row.get("accrual"), row.get("uploaded_at")))
                    .collect())
            }
        })
        .await
    }

    async fn get_balance(&self, login: &str) -> Result<Balance, StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            async move {
                let row = sqlx::query("SELECT login, accrued, withdrawn FROM balance WHERE login = $1")
                    .bind(&login)
                    .fetch_optional(&pool)
                    .await
                    .map_err(retry::classify)?;

                match row {
                    Some(row) => {
                        let accrued: Decimal = row.get("accrued");
                        let withdrawn: Decimal = row.get("withdrawn");
                        Ok(Balance {
                            login: row.get("login"),
                            accrued: Amount::try_new(accrued).unwrap_or(Amount::ZERO),
                            withdrawn: Amount::try_new(withdrawn).unwrap_or(Amount::ZERO),
                        })
                    }
                    None => Err(backoff::Error::permanent(StoreError::NotFound)),
                }
            }
        })
        .await
    }

    async fn list_withdrawals(&self, login: &str) -> Result<Vec<Withdrawal>, StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            async move {
                let rows = sqlx::query(
                    "SELECT login, order_number, sum, processed_at FROM withdrawals \
                     WHERE login = $1 ORDER BY processed_at DESC",
                )
                .bind(&login)
                .fetch_all(&pool)
                .await
                .map_err(retry::classify)?;

                Ok(rows
                    .into_iter()
                    .map(|row| {
                        let sum: Decimal = row.get("sum");
                        Withdrawal {
                            login: row.get("login"),
                            order_number: row.get("order_number"),
                            sum: Amount::try_new(sum).unwrap_or(Amount::ZERO),
                            processed_at: row.get("processed_at"),
                        }
                    })
                    .collect())
            }
        })
        .await
    }

    async fn withdraw_from_balance(&self, login: &str, order_number: &str, sum: Amount) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let login = login.to_string();
        let order_number = order_number.to_string();
        let sum_decimal = sum.as_decimal();
        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            let order_number = order_number.clone();
            async move {
                let mut tx = pool.begin().await.map_err(retry::classify)?;

                let row = sqlx::query(
                    "UPDATE balance SET withdrawn = withdrawn + $1 WHERE login = $2 \
                     RETURNING accrued, withdrawn",
                )
                .bind(sum_decimal)
                .bind(&login)
                .fetch_optional(&mut *tx)
                .await
                .map_err(retry::classify)?;

                let row = match row {
                    Some(row) => row,
                    None => return Err(backoff::Error::permanent(StoreError::NotFound)),
                };

                let accrued: Decimal = row.get("accrued");
                let withdrawn: Decimal = row.get("withdrawn");

                if accrued - withdrawn < Decimal::ZERO {
                    tx.rollback().await.map_err(retry::classify)?;
                    return Err(backoff::Error::permanent(StoreError::InsufficientFunds));
                }

                sqlx::query("INSERT INTO withdrawals (login, order_number, sum) VALUES ($1, $2, $3)")
                    .bind(&login)
                    .bind(&order_number)
                    .bind(sum_decimal)
                    .execute(&mut *tx)
                    .await
                    .map_err(retry::classify)?;

                tx.commit().await.map_err(retry::classify)?;
                Ok(())
            }
        })
        .await
    }

    async fn update_balance_accrued(&self, order: &Order, accrual: &OrderAccrual) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        let login = order.login.clone();
        let number = order.number.clone();
        let new_status: DbOrderStatus = accrual.canonical_status().into();
        let new_accrual_amount = accrual.accrual_amount();
        let delta = if !order.status.is_terminal() && accrual.canonical_status() == OrderStatus::Processed {
            new_accrual_amount.as_decimal()
        } else {
            Decimal::ZERO
        };

        with_retry(|| {
            let pool = pool.clone();
            let login = login.clone();
            let number = number.clone();
            async move {
                let mut tx = pool.begin().await.map_err(retry::classify)?;

                // Only mutate the order if it is not already terminal
                // (invariant I2): the WHERE clause makes this atomic even
                // under a concurrent reconciler tick.
                let updated = sqlx::query(
                    "UPDATE orders SET status = $1, accrual = $2 \
                     WHERE number = $3 AND status NOT IN ('INVALID', 'PROCESSED')",
                )
                .bind(new_status)
                .bind(new_accrual_amount.as_decimal())
                .bind(&number)
                .execute(&mut *tx)
                .await
                .map_err(retry::classify)?;

                if updated.rows_affected() == 1 && delta > Decimal::ZERO {
                    sqlx::query("UPDATE balance SET accrued = accrued + $1 WHERE login = $2")
                        .bind(delta)
                        .bind(&login)
                        .execute(&mut *tx)
                        .await
                        .map_err(retry::classify)?;
                }

                tx.commit().await.map_err(retry::classify)?;
                Ok(())
            }
        })
        .await
    }
}
