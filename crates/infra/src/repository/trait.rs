use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use banking_core::{Account, Customer, CustomerId, NewAccount, NewCustomer};

/// Storage operation error.
///
/// These are **infrastructure errors**. Callers decide which of them are
/// expected conditions; the rest are reported as internal failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row matched the lookup key.
    #[error("{entity} with {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend answered with an error.
    #[error("database error: {0}")]
    Database(String),

    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn customer_not_found(email: &str) -> Self {
        Self::NotFound {
            entity: "customer",
            key: format!("email {email}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Read/write port over customer storage.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// All customers, in storage order.
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Lookup by the external key. Fails with `NotFound` when no row matches.
    async fn find_by_email(&self, email: &str) -> Result<Customer, RepositoryError>;

    /// Insert and return the stored row with its generated id.
    async fn create(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Remove by the external key. Fails with `NotFound` when no row matches.
    async fn delete_by_email(&self, email: &str) -> Result<(), RepositoryError>;
}

/// Read/write port over account storage.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Live (not soft-deleted) accounts of a customer. An empty list is not an error.
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Account>, RepositoryError>;

    /// Insert under an already persisted customer and return the stored row.
    async fn create(&self, customer_id: CustomerId, account: NewAccount) -> Result<Account, RepositoryError>;
}

#[async_trait]
impl<S> CustomerRepository for Arc<S>
where
    S: CustomerRepository + ?Sized,
{
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        (**self).find_all().await
    }

    async fn find_by_email(&self, email: &str) -> Result<Customer, RepositoryError> {
        (**self).find_by_email(email).await
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        (**self).create(customer).await
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), RepositoryError> {
        (**self).delete_by_email(email).await
    }
}

#[async_trait]
impl<S> AccountRepository for Arc<S>
where
    S: AccountRepository + ?Sized,
{
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Account>, RepositoryError> {
        (**self).find_by_customer_id(customer_id).await
    }

    async fn create(&self, customer_id: CustomerId, account: NewAccount) -> Result<Account, RepositoryError> {
        (**self).create(customer_id, account).await
    }
}
