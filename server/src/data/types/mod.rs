//! Domain model shared by the repositories and the API
//!
//! Entities are what list and get queries return, with every referenced
//! entity fully populated. `New*` inputs are what create and update accept;
//! they refer to other entities by id only.

mod accounts;
mod funds;
mod ledger;
mod portfolios;

pub use accounts::{Account, AccountCategory, NewAccount, NewAccountCategory};
pub use funds::{AssetCategory, Fund, Holding, NewAssetCategory, NewFund, NewHolding};
pub use ledger::{Contribution, Expense, ExpenseCategory, NewContribution, NewExpense, NewExpenseCategory};
pub use portfolios::{
    NewPortfolio, NewPortfolioAssetCategoryMapping, NewPortfolioHoldingMapping, Portfolio,
    PortfolioAssetCategoryMapping, PortfolioHoldingMapping,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationError;

/// Reference to another entity by id, as `{"uuid": "..."}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    pub uuid: Uuid,
}

impl From<Uuid> for EntityRef {
    fn from(uuid: Uuid) -> Self {
        Self { uuid }
    }
}

/// Validator for amounts, prices and share counts
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative")
            .with_message("Value must not be negative".into()));
    }
    Ok(())
}

/// Validator for portfolio allocation percentages
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_range")
            .with_message("Percentage must be between 0 and 100".into()));
    }
    Ok(())
}

/// Lenient date input: `YYYY-MM-DD` or a full RFC 3339 timestamp
pub mod date_input_format {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    /// Parse a calendar date; timestamps keep the date in their own offset
    pub fn parse_date(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }

    pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                raw
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&dec!(0)).is_ok());
        assert!(validate_non_negative(&dec!(12.34)).is_ok());
        assert!(validate_non_negative(&dec!(-0.01)).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(&dec!(0)).is_ok());
        assert!(validate_percentage(&dec!(100)).is_ok());
        assert!(validate_percentage(&dec!(33.3)).is_ok());
        assert!(validate_percentage(&dec!(100.01)).is_err());
        assert!(validate_percentage(&dec!(-1)).is_err());
    }

    #[test]
    fn test_entity_ref_json() {
        let reference: EntityRef =
            serde_json::from_str(r#"{"uuid":"00000000-0000-0000-0000-000000000000"}"#).unwrap();
        assert_eq!(reference, EntityRef::from(Uuid::nil()));
    }

    #[test]
    fn test_parse_date_accepts_plain_and_timestamp() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 3, 15);

        assert_eq!(date_input_format::parse_date("2024-03-15"), expected);
        assert_eq!(
            date_input_format::parse_date("2024-03-15T04:00:00.000Z"),
            expected
        );
        assert_eq!(
            date_input_format::parse_date("2024-03-15T23:30:00-05:00"),
            expected
        );
        assert_eq!(date_input_format::parse_date("03/15/2024"), None);
    }
}
