//! Accounts and their categories

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{EntityRef, validate_non_negative};

/// Account category (e.g. retirement, brokerage, checking)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountCategory {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub category: AccountCategory,
    pub name: String,
    pub description: String,
    pub amount: Decimal,
}

/// Input for creating or replacing an account category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

/// Input for creating or replacing an account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub category: EntityRef,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_account() -> Account {
        Account {
            id: Uuid::nil(),
            category: AccountCategory {
                id: Uuid::nil(),
                name: "Retirement".to_string(),
                description: "Tax advantaged".to_string(),
            },
            name: "Roth IRA".to_string(),
            description: String::new(),
            amount: dec!(1500.50),
        }
    }

    #[test]
    fn test_account_serializes_id_as_uuid() {
        let json = serde_json::to_value(sample_account()).unwrap();

        assert_eq!(json["uuid"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["category"]["uuid"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["category"]["name"], "Retirement");
        assert_eq!(json["amount"], 1500.5);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_new_account_deserialize() {
        let input: NewAccount = serde_json::from_str(
            r#"{
                "category": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "name": "Brokerage",
                "amount": 250.75
            }"#,
        )
        .unwrap();

        assert_eq!(input.category.uuid, Uuid::nil());
        assert_eq!(input.description, "");
        assert_eq!(input.amount, dec!(250.75));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_new_account_rejects_negative_amount() {
        let input = NewAccount {
            category: Uuid::nil().into(),
            name: "Checking".to_string(),
            description: String::new(),
            amount: dec!(-1),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }

    #[test]
    fn test_new_account_category_requires_name() {
        let input = NewAccountCategory {
            name: String::new(),
            description: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
