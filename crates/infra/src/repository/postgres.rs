//! Postgres-backed customer and account repositories.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE customers (
//!     id          BIGSERIAL PRIMARY KEY,
//!     first_name  TEXT NOT NULL,
//!     last_name   TEXT NOT NULL,
//!     email       TEXT NOT NULL UNIQUE,
//!     phone       TEXT NOT NULL DEFAULT ''
//! );
//!
//! CREATE TABLE accounts (
//!     id                  BIGSERIAL PRIMARY KEY,
//!     customer_id         BIGINT NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
//!     account_number      TEXT NOT NULL,
//!     balance             BIGINT NOT NULL DEFAULT 0,
//!     account_description TEXT NOT NULL DEFAULT '',
//!     created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     deleted_at          TIMESTAMPTZ
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Database` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | Other | N/A | `Database` |
//!
//! Not-found is decided by the query shape (`fetch_optional`, `rows_affected`),
//! never by `RowNotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use banking_core::{Account, AccountId, Customer, CustomerId, NewAccount, NewCustomer};

use super::r#trait::{AccountRepository, CustomerRepository, RepositoryError};

/// Customer port over the `customers` table.
///
/// `Send + Sync`; the pool handles connection sharing.
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: Arc<PgPool>,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, phone
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(customer_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, phone
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        match row {
            Some(row) => customer_from_row(&row),
            None => Err(RepositoryError::customer_not_found(email)),
        }
    }

    #[instrument(skip(self, customer), fields(email = %customer.email), err)]
    async fn create(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO customers (first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, phone
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_customer", e))?;

        customer_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_email(&self, email: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE email = $1")
            .bind(email)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_email", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::customer_not_found(email));
        }
        Ok(())
    }
}

/// Account port over the `accounts` table.
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: Arc<PgPool>,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self), fields(customer_id = %customer_id), err)]
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                customer_id,
                account_number,
                balance,
                account_description,
                created_at,
                updated_at,
                deleted_at
            FROM accounts
            WHERE customer_id = $1 AND deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .bind(customer_id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_customer_id", e))?;

        rows.iter().map(account_from_row).collect()
    }

    #[instrument(skip(self, account), fields(customer_id = %customer_id), err)]
    async fn create(&self, customer_id: CustomerId, account: NewAccount) -> Result<Account, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (
                customer_id,
                account_number,
                balance,
                account_description,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING
                id,
                customer_id,
                account_number,
                balance,
                account_description,
                created_at,
                updated_at,
                deleted_at
            "#,
        )
        .bind(customer_id.get())
        .bind(&account.account_number)
        .bind(account.balance)
        .bind(&account.description)
        .bind(now)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_account", e))?;

        account_from_row(&row)
    }
}

fn customer_from_row(row: &PgRow) -> Result<Customer, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Database(format!("failed to decode customer row: {e}"));

    Ok(Customer {
        id: CustomerId::new(row.try_get::<i64, _>("id").map_err(decode)?),
        first_name: row.try_get("first_name").map_err(decode)?,
        last_name: row.try_get("last_name").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
    })
}

fn account_from_row(row: &PgRow) -> Result<Account, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Database(format!("failed to decode account row: {e}"));

    Ok(Account {
        id: AccountId::new(row.try_get::<i64, _>("id").map_err(decode)?),
        customer_id: CustomerId::new(row.try_get::<i64, _>("customer_id").map_err(decode)?),
        account_number: row.try_get("account_number").map_err(decode)?,
        balance: row.try_get("balance").map_err(decode)?,
        description: row.try_get("account_description").map_err(decode)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode)?,
        deleted_at: row
            .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
            .map_err(decode)?,
    })
}

/// Map SQLx errors to repository errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{} failed: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => RepositoryError::Conflict(msg),
                _ => RepositoryError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable(format!("connection pool unavailable in {}", operation))
        }
        sqlx::Error::Io(e) => RepositoryError::Unavailable(format!("io error in {}: {}", operation, e)),
        other => RepositoryError::Database(format!("sqlx error in {}: {}", operation, other)),
    }
}
