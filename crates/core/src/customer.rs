//! Customer records, their transfer shapes, and the conversions between them.
//!
//! Conversions are pure and total. Going entity → DTO copies the server-assigned
//! id; going DTO → entity never does (storage assigns it).

use serde::{Deserialize, Serialize};

use crate::account::AccountDto;
use crate::email::Email;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::CustomerId;

/// Persisted customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

impl Customer {
    /// Project to the wire shape.
    ///
    /// `accounts` is carried through as given: `None` stays absent, `Some(vec![])`
    /// stays an empty list.
    pub fn to_dto(&self, accounts: Option<Vec<AccountDto>>) -> CustomerDto {
        CustomerDto {
            id: Some(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            accounts,
        }
    }

    pub fn with_accounts(&self, accounts: Vec<AccountDto>) -> CustomerWithAccounts {
        CustomerWithAccounts {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            accounts,
        }
    }
}

/// Customer attributes a client may supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&CustomerDto> for NewCustomer {
    fn from(dto: &CustomerDto) -> Self {
        NewCustomer {
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            phone: dto.phone.clone(),
        }
    }
}

impl From<CustomerDto> for NewCustomer {
    fn from(dto: CustomerDto) -> Self {
        NewCustomer::from(&dto)
    }
}

/// Customer transfer shape, optionally with nested accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<AccountDto>>,
}

impl CustomerDto {
    /// Boundary checks applied to inbound payloads.
    pub fn validate(&self) -> DomainResult<()> {
        if self.first_name.trim().is_empty() {
            return Err(DomainError::validation("first_name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(DomainError::validation("last_name is required"));
        }
        Email::parse(&self.email)?;

        for account in self.accounts.iter().flatten() {
            account.validate()?;
        }
        Ok(())
    }
}

/// Read-only response shape: a customer and its live accounts.
///
/// `accounts` is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerWithAccounts {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub accounts: Vec<AccountDto>,
}
