//! Dated money movements: contributions into accounts and categorized expenses

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{Account, EntityRef, date_input_format, validate_non_negative};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub account: Account,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "date_input_format::deserialize_date")]
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub category: ExpenseCategory,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "date_input_format::deserialize_date")]
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub account: EntityRef,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[serde(deserialize_with = "date_input_format::deserialize_date")]
    pub date: NaiveDate,

    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub category: EntityRef,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[serde(deserialize_with = "date_input_format::deserialize_date")]
    pub date: NaiveDate,

    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_round_trips_date() {
        let expense = Expense {
            id: Uuid::nil(),
            category: ExpenseCategory {
                id: Uuid::nil(),
                name: "Groceries".to_string(),
                description: String::new(),
            },
            name: "Market".to_string(),
            description: "Weekly shop".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            amount: dec!(84.12),
        };

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["date"], "2024-03-09");

        let parsed: Expense = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.date, expense.date);
        assert_eq!(parsed.category.name, "Groceries");
    }

    #[test]
    fn test_new_contribution_rejects_bad_date() {
        let result = serde_json::from_str::<NewContribution>(
            r#"{
                "account": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "name": "Paycheck",
                "date": "03/09/2024",
                "amount": 500
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_contribution_accepts_iso_timestamp() {
        let contribution: NewContribution = serde_json::from_str(
            r#"{
                "account": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "name": "Paycheck",
                "description": "",
                "date": "2024-03-15T04:00:00.000Z",
                "amount": 500
            }"#,
        )
        .unwrap();

        assert_eq!(contribution.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_new_expense_accepts_plain_date() {
        let expense: NewExpense = serde_json::from_str(
            r#"{
                "category": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "name": "Rent",
                "date": "2024-04-01",
                "amount": 1450.5
            }"#,
        )
        .unwrap();

        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }
}
