//! Service wiring and customer orchestration.
//!
//! `CustomerService` is the only place that decides which storage failures are
//! expected conditions (not-found lookups, empty listings, duplicate emails);
//! everything else is reported as an internal failure.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, instrument, warn};

use banking_core::{
    Account, AppError, CustomerDto, CustomerWithAccounts, NewAccount, NewCustomer,
};
use banking_infra::{
    config::{AppConfig, StoreBackend},
    db,
    repository::{
        AccountRepository, CustomerRepository, InMemoryStore, PostgresAccountRepository,
        PostgresCustomerRepository, RepositoryError,
    },
};

/// Customer/account orchestration over the two persistence ports.
///
/// Holds no state besides the ports. Multi-step creation is not atomic: when an
/// account insert fails, the customer and the accounts inserted before it stay
/// persisted.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { customers, accounts }
    }

    /// All customers in storage order. An empty store is reported as not found.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<CustomerDto>, AppError> {
        let customers = self
            .customers
            .find_all()
            .await
            .map_err(|e| internal("failed to retrieve customers", e))?;

        if customers.is_empty() {
            warn!("customer listing is empty");
            return Err(AppError::not_found("no customers found"));
        }

        Ok(customers.iter().map(|c| c.to_dto(None)).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_customer_with_accounts(&self, email: &str) -> Result<CustomerWithAccounts, AppError> {
        let customer = self.customers.find_by_email(email).await.map_err(|e| {
            if e.is_not_found() {
                warn!(%email, "customer lookup missed");
                customer_not_found(email)
            } else {
                internal("failed to look up customer", e)
            }
        })?;

        let accounts = self
            .accounts
            .find_by_customer_id(customer.id)
            .await
            .map_err(|e| internal("failed to retrieve customer accounts", e))?;

        Ok(customer.with_accounts(accounts.iter().map(Account::to_dto).collect()))
    }

    /// Persist a customer, then each nested account in input order.
    ///
    /// Client-supplied ids and timestamps are ignored. The response carries the
    /// nested accounts exactly when the input did (`None` stays `None`).
    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn create_customer(&self, dto: CustomerDto) -> Result<CustomerDto, AppError> {
        let new_customer = NewCustomer::from(&dto);
        let email = new_customer.email.clone();

        let customer = self.customers.create(new_customer).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                warn!(%email, "customer email already taken");
                AppError::conflict(format!("customer with email {email} already exists"))
            }
            other => internal("failed to create customer", other),
        })?;

        let accounts = match &dto.accounts {
            None => None,
            Some(inputs) => {
                let mut created = Vec::with_capacity(inputs.len());
                for (index, input) in inputs.iter().enumerate() {
                    let account = self
                        .accounts
                        .create(customer.id, NewAccount::from(input))
                        .await
                        .map_err(|e| {
                            error!(
                                customer_id = %customer.id,
                                index,
                                persisted = created.len(),
                                error = %e,
                                "account creation failed; earlier inserts are kept"
                            );
                            AppError::internal_from(
                                &format!("failed to create account {}", input.account_number),
                                e,
                            )
                        })?;
                    created.push(account.to_dto());
                }
                Some(created)
            }
        };

        info!(
            customer_id = %customer.id,
            accounts = accounts.as_ref().map_or(0, Vec::len),
            "customer created"
        );
        Ok(customer.to_dto(accounts))
    }

    #[instrument(skip(self))]
    pub async fn delete_customer_by_email(&self, email: &str) -> Result<(), AppError> {
        self.customers.delete_by_email(email).await.map_err(|e| {
            if e.is_not_found() {
                warn!(%email, "delete target missing");
                customer_not_found(email)
            } else {
                internal("failed to delete customer", e)
            }
        })?;

        info!(%email, "customer deleted");
        Ok(())
    }
}

fn customer_not_found(email: &str) -> AppError {
    AppError::not_found(format!("customer with email {email} not found"))
}

fn internal(context: &str, err: RepositoryError) -> AppError {
    error!(error = %err, "{context}");
    AppError::internal_from(context, err)
}

/// Services shared by every route.
#[derive(Clone)]
pub struct AppServices {
    pub customers: CustomerService,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            customers: CustomerService::new(store.clone(), store),
        }
    }

    pub fn postgres(pool: db::PgPool) -> Self {
        Self {
            customers: CustomerService::new(
                Arc::new(PostgresCustomerRepository::new(pool.clone())),
                Arc::new(PostgresAccountRepository::new(pool)),
            ),
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match config.store {
        StoreBackend::InMemory => {
            warn!("using in-memory store; data is lost on restart");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres => {
            let pool = db::connect(&config.database)
                .await
                .context("failed to connect to postgres")?;
            Ok(AppServices::postgres(pool))
        }
    }
}
