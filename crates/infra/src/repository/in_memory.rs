use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use banking_core::{Account, AccountId, Customer, CustomerId, NewAccount, NewCustomer};

use super::r#trait::{AccountRepository, CustomerRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<Customer>,
    accounts: Vec<Account>,
    last_customer_id: i64,
    last_account_id: i64,
}

/// In-memory customer + account storage.
///
/// Intended for tests/dev. Implements both ports over one set of tables so
/// the foreign reference from accounts to customers can be checked, and so a
/// customer delete drops its accounts the way an `ON DELETE CASCADE` would.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub fn customer_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.customers.len())
    }

    /// Every stored account row, soft-deleted ones included, in insert order.
    pub fn accounts_snapshot(&self) -> Result<Vec<Account>, RepositoryError> {
        Ok(self.read()?.accounts.clone())
    }

    /// Mark an account as soft-deleted.
    pub fn soft_delete_account(&self, id: AccountId) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "account",
                key: format!("id {id}"),
            })?;
        account.deleted_at = Some(Utc::now());
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.read()?.customers.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Customer, RepositoryError> {
        self.read()?
            .customers
            .iter()
            .find(|c| c.email == email)
            .cloned()
            .ok_or_else(|| RepositoryError::customer_not_found(email))
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.write()?;

        if tables.customers.iter().any(|c| c.email == customer.email) {
            return Err(RepositoryError::Conflict(format!(
                "customer with email {} already exists",
                customer.email
            )));
        }

        tables.last_customer_id += 1;
        let stored = Customer {
            id: CustomerId::new(tables.last_customer_id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
        };
        tables.customers.push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;

        let idx = tables
            .customers
            .iter()
            .position(|c| c.email == email)
            .ok_or_else(|| RepositoryError::customer_not_found(email))?;
        let removed = tables.customers.remove(idx);
        tables.accounts.retain(|a| a.customer_id != removed.id);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<Account>, RepositoryError> {
        Ok(self
            .read()?
            .accounts
            .iter()
            .filter(|a| a.customer_id == customer_id && !a.is_deleted())
            .cloned()
            .collect())
    }

    async fn create(&self, customer_id: CustomerId, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut tables = self.write()?;

        if !tables.customers.iter().any(|c| c.id == customer_id) {
            return Err(RepositoryError::Database(format!(
                "account references unknown customer id {customer_id}"
            )));
        }

        tables.last_account_id += 1;
        let now = Utc::now();
        let stored = Account {
            id: AccountId::new(tables.last_account_id),
            customer_id,
            account_number: account.account_number,
            balance: account.balance,
            description: account.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.accounts.push(stored.clone());
        Ok(stored)
    }
}
