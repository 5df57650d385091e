//! Infrastructure layer: persistence adapters, database pool, configuration.

pub mod config;
pub mod db;
pub mod repository;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use repository::{AccountRepository, CustomerRepository, InMemoryStore, RepositoryError};
