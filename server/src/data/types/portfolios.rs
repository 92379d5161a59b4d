//! Portfolios group holdings and carry a target allocation per asset category

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{AssetCategory, EntityRef, Holding, validate_percentage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// Membership of a holding in a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHoldingMapping {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub portfolio: Portfolio,
    pub holding: Holding,
}

/// Target share of a portfolio allocated to an asset category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAssetCategoryMapping {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub portfolio: Portfolio,
    pub asset_category: AssetCategory,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioHoldingMapping {
    pub portfolio: EntityRef,
    pub holding: EntityRef,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioAssetCategoryMapping {
    pub portfolio: EntityRef,
    pub asset_category: EntityRef,

    #[validate(custom(function = "validate_percentage"))]
    pub percentage: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_category_mapping_deserialize() {
        let input: NewPortfolioAssetCategoryMapping = serde_json::from_str(
            r#"{
                "portfolio": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "assetCategory": {"uuid": "00000000-0000-0000-0000-000000000000"},
                "percentage": 60
            }"#,
        )
        .unwrap();

        assert_eq!(input.percentage, dec!(60));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_asset_category_mapping_percentage_bounds() {
        let input = NewPortfolioAssetCategoryMapping {
            portfolio: Uuid::nil().into(),
            asset_category: Uuid::nil().into(),
            percentage: dec!(120),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("percentage"));
    }

    #[test]
    fn test_holding_mapping_requires_both_references() {
        let result = serde_json::from_str::<NewPortfolioHoldingMapping>(
            r#"{"portfolio": {"uuid": "00000000-0000-0000-0000-000000000000"}}"#,
        );
        assert!(result.is_err());
    }
}
