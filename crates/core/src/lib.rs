//! `banking-core` — customer/account domain building blocks.
//!
//! This crate contains **pure domain** types: entities, transfer shapes, the
//! conversions between them, and the classified application error. No IO.

pub mod account;
pub mod customer;
pub mod email;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use account::{Account, AccountDto, NewAccount};
pub use customer::{Customer, CustomerDto, CustomerWithAccounts, NewCustomer};
pub use email::Email;
pub use entity::Entity;
pub use error::{AppError, DomainError, DomainResult, StatusClass};
pub use id::{AccountId, CustomerId};
pub use value_object::ValueObject;
