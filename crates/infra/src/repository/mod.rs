//! Persistence ports for customers and accounts.
//!
//! Each port is one trait with two implementations: Postgres for production
//! and an in-memory store for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::{PostgresAccountRepository, PostgresCustomerRepository};
pub use r#trait::{AccountRepository, CustomerRepository, RepositoryError};
