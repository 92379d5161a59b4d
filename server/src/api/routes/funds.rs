//! Asset category and fund endpoints

use serde::Deserialize;
use uuid::Uuid;

use super::resource::{ListFilters, crud_resource};
use crate::api::types::{ApiError, parse_name_list};
use crate::data::postgres::query::FilterValues;
use crate::data::postgres::repositories::fund;
use crate::data::types::{AssetCategory, Fund, NewAssetCategory, NewFund};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetCategoryFilters {
    pub asset_category: Option<Uuid>,
}

impl ListFilters for AssetCategoryFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.asset_category {
            values.insert("asset_category", id);
        }
        Ok(values)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundFilters {
    pub fund: Option<Uuid>,
    /// Comma-separated asset category names
    pub categories: Option<String>,
}

impl ListFilters for FundFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.fund {
            values.insert("fund", id);
        }
        if let Some(categories) = self.categories {
            values.insert("categories", parse_name_list("categories", &categories)?);
        }
        Ok(values)
    }
}

crud_resource!(
    AssetCategories, "asset_category",
    entity = AssetCategory, new = NewAssetCategory, filters = AssetCategoryFilters,
    list = fund::list_asset_categories, get = fund::get_asset_category,
    create = fund::create_asset_categories, update = fund::update_asset_category,
    delete = fund::delete_asset_category,
);

crud_resource!(
    Funds, "fund",
    entity = Fund, new = NewFund, filters = FundFilters,
    list = fund::list_funds, get = fund::get_fund,
    create = fund::create_funds, update = fund::update_fund,
    delete = fund::delete_fund,
);
