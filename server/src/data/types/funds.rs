//! Funds, their asset categories, and holdings of funds within accounts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{Account, EntityRef, validate_non_negative};

/// Asset category (e.g. domestic equity, bonds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetCategory {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub category: AssetCategory,
    pub name: String,
    pub ticker_symbol: String,
    pub share_price: Decimal,
    pub expense_ratio: Decimal,
}

/// Shares of one fund held in one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub account: Account,
    pub fund: Fund,
    pub shares: Decimal,
    /// Market value, `shares * fund.sharePrice`; derived, never stored
    #[serde(default)]
    pub value: Decimal,
}

impl Holding {
    pub fn new(id: Uuid, account: Account, fund: Fund, shares: Decimal) -> Self {
        let value = shares * fund.share_price;
        Self {
            id,
            account,
            fund,
            shares,
            value,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFund {
    pub category: EntityRef,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 10, message = "Ticker symbol must be 1-10 characters"))]
    pub ticker_symbol: String,

    #[validate(custom(function = "validate_non_negative"))]
    pub share_price: Decimal,

    #[validate(custom(function = "validate_non_negative"))]
    pub expense_ratio: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub account: EntityRef,
    pub fund: EntityRef,

    #[validate(custom(function = "validate_non_negative"))]
    pub shares: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::AccountCategory;
    use rust_decimal_macros::dec;

    fn sample_holding(shares: Decimal, share_price: Decimal) -> Holding {
        Holding::new(
            Uuid::new_v4(),
            Account {
                id: Uuid::new_v4(),
                category: AccountCategory {
                    id: Uuid::new_v4(),
                    name: "Retirement".to_string(),
                    description: String::new(),
                },
                name: "401k".to_string(),
                description: String::new(),
                amount: dec!(0),
            },
            Fund {
                id: Uuid::new_v4(),
                category: AssetCategory {
                    id: Uuid::new_v4(),
                    name: "US Equity".to_string(),
                    description: String::new(),
                },
                name: "Total Stock Market".to_string(),
                ticker_symbol: "VTSAX".to_string(),
                share_price,
                expense_ratio: dec!(0.0004),
            },
            shares,
        )
    }

    #[test]
    fn test_holding_value() {
        let holding = sample_holding(dec!(12.5), dec!(100.20));
        assert_eq!(holding.value, dec!(1252.5));
    }

    #[test]
    fn test_holding_value_without_shares() {
        let holding = sample_holding(dec!(0), dec!(87.13));
        assert_eq!(holding.value, Decimal::ZERO);
    }

    #[test]
    fn test_holding_json_includes_value() {
        let holding = sample_holding(dec!(4), dec!(25.5));
        let json = serde_json::to_value(&holding).unwrap();

        assert_eq!(json["shares"], 4.0);
        assert_eq!(json["value"], 102.0);
        assert!(json["fund"].get("sharePrice").is_some());
    }

    #[test]
    fn test_fund_json_field_names() {
        let holding = sample_holding(dec!(1), dec!(10));
        let json = serde_json::to_value(&holding.fund).unwrap();

        assert_eq!(json["tickerSymbol"], "VTSAX");
        assert!(json.get("sharePrice").is_some());
        assert!(json.get("expenseRatio").is_some());
        assert!(json["category"].get("uuid").is_some());
    }

    #[test]
    fn test_new_fund_validation() {
        let fund = NewFund {
            category: Uuid::nil().into(),
            name: "Bond Index".to_string(),
            ticker_symbol: "VBTLX".to_string(),
            share_price: dec!(10.55),
            expense_ratio: dec!(0.0005),
        };
        assert!(fund.validate().is_ok());

        let fund = NewFund {
            ticker_symbol: "TOO-LONG-TICKER".to_string(),
            ..fund
        };
        let errors = fund.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ticker_symbol"));
    }
}
