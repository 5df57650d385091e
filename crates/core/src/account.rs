//! Account records and their wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{AccountId, CustomerId};

/// Persisted account row.
///
/// `balance` is in minor currency units. `deleted_at` is the soft-delete marker;
/// read ports exclude rows where it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_number: String,
    pub balance: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }
}

impl Account {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Wire projection: drops the owning customer id and soft-delete bookkeeping.
    pub fn to_dto(&self) -> AccountDto {
        AccountDto {
            id: Some(self.id),
            account_number: self.account_number.clone(),
            balance: self.balance,
            description: self.description.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Account attributes a client may supply. The owning customer is attached by
/// the account port at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub account_number: String,
    pub balance: i64,
    pub description: String,
}

/// Account transfer shape.
///
/// Server-assigned fields are optional: set on responses, ignored on input.
/// On the wire `balance` is a decimal amount in major units (`100.5`); in
/// memory it is minor units (`10050`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AccountId>,
    pub account_number: String,
    #[serde(default, with = "major_units")]
    pub balance: i64,
    #[serde(default, rename = "account_description", alias = "description")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountDto {
    pub fn validate(&self) -> DomainResult<()> {
        if self.account_number.trim().is_empty() {
            return Err(DomainError::validation("account_number is required"));
        }
        Ok(())
    }
}

impl From<&AccountDto> for NewAccount {
    fn from(dto: &AccountDto) -> Self {
        NewAccount {
            account_number: dto.account_number.clone(),
            balance: dto.balance,
            description: dto.description.clone(),
        }
    }
}

mod major_units {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserializer, Serializer};

    const MINOR_DIGITS: u32 = 2;

    pub fn serialize<S: Serializer>(minor: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&Decimal::new(*minor, MINOR_DIGITS), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let major = rust_decimal::serde::float::deserialize(deserializer)?;
        to_minor(major).ok_or_else(|| {
            D::Error::custom(format!("balance {major} is not a whole number of minor units"))
        })
    }

    pub(super) fn to_minor(major: Decimal) -> Option<i64> {
        let minor = major.checked_mul(Decimal::ONE_HUNDRED)?;
        if !minor.fract().is_zero() {
            return None;
        }
        minor.to_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_account() -> Account {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Account {
            id: AccountId::new(7),
            customer_id: CustomerId::new(3),
            account_number: "ACC-001".to_string(),
            balance: 12_550,
            description: "savings".to_string(),
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn dto_omits_customer_id_and_deleted_at() {
        let json = serde_json::to_value(sample_account().to_dto()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("customer_id"));
        assert!(!obj.contains_key("deleted_at"));
        assert_eq!(obj["id"], 7);
        assert_eq!(obj["balance"].as_f64(), Some(125.5));
        assert_eq!(obj["account_description"], "savings");
    }

    #[test]
    fn reverse_conversion_ignores_server_fields() {
        let dto = sample_account().to_dto();
        let new = NewAccount::from(&dto);

        assert_eq!(
            new,
            NewAccount {
                account_number: "ACC-001".to_string(),
                balance: 12_550,
                description: "savings".to_string(),
            }
        );
    }

    #[test]
    fn input_without_optional_fields_deserializes() {
        let dto: AccountDto = serde_json::from_str(r#"{"account_number":"ACC-9"}"#).unwrap();
        assert_eq!(dto.id, None);
        assert_eq!(dto.balance, 0);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn decimal_balance_is_read_as_minor_units() {
        let dto: AccountDto =
            serde_json::from_str(r#"{"account_number":"ACC-1","balance":100.5}"#).unwrap();
        assert_eq!(dto.balance, 10_050);

        let whole: AccountDto =
            serde_json::from_str(r#"{"account_number":"ACC-1","balance":42}"#).unwrap();
        assert_eq!(whole.balance, 4_200);
    }

    #[test]
    fn sub_cent_balance_is_rejected() {
        let parsed = serde_json::from_str::<AccountDto>(r#"{"account_number":"ACC-1","balance":0.001}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn description_is_read_from_either_key() {
        let current: AccountDto = serde_json::from_str(
            r#"{"account_number":"ACC-1","account_description":"payroll"}"#,
        )
        .unwrap();
        let short: AccountDto =
            serde_json::from_str(r#"{"account_number":"ACC-1","description":"payroll"}"#).unwrap();

        assert_eq!(current.description, "payroll");
        assert_eq!(short.description, "payroll");
    }

    #[test]
    fn to_minor_handles_scale_and_overflow() {
        use rust_decimal::Decimal;

        assert_eq!(major_units::to_minor(Decimal::new(-1999, 2)), Some(-1_999));
        assert_eq!(major_units::to_minor(Decimal::new(15, 3)), None);
        assert_eq!(major_units::to_minor(Decimal::MAX), None);
    }

    #[test]
    fn blank_account_number_is_rejected() {
        let dto: AccountDto = serde_json::from_str(r#"{"account_number":"  "}"#).unwrap();
        assert_eq!(dto.validate(), Err(DomainError::validation("account_number is required")));
    }
}
