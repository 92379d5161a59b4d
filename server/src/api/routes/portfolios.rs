//! Portfolio and portfolio mapping endpoints

use serde::Deserialize;
use uuid::Uuid;

use super::resource::{ListFilters, crud_resource};
use crate::api::types::{ApiError, parse_uuid_list};
use crate::data::postgres::query::FilterValues;
use crate::data::postgres::repositories::portfolio;
use crate::data::types::{
    NewPortfolio, NewPortfolioAssetCategoryMapping, NewPortfolioHoldingMapping, Portfolio,
    PortfolioAssetCategoryMapping, PortfolioHoldingMapping,
};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioFilters {
    pub portfolio: Option<Uuid>,
}

impl ListFilters for PortfolioFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.portfolio {
            values.insert("portfolio", id);
        }
        Ok(values)
    }
}

/// Query parameters shared by both mapping lists
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingFilters {
    pub mapping: Option<Uuid>,
    /// Comma-separated portfolio ids
    pub portfolios: Option<String>,
}

impl ListFilters for MappingFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.mapping {
            values.insert("mapping", id);
        }
        if let Some(portfolios) = self.portfolios {
            values.insert("portfolios", parse_uuid_list("portfolios", &portfolios)?);
        }
        Ok(values)
    }
}

crud_resource!(
    Portfolios, "portfolio",
    entity = Portfolio, new = NewPortfolio, filters = PortfolioFilters,
    list = portfolio::list_portfolios, get = portfolio::get_portfolio,
    create = portfolio::create_portfolios, update = portfolio::update_portfolio,
    delete = portfolio::delete_portfolio,
);

crud_resource!(
    PortfolioHoldingMappings, "portfolio_holding_mapping",
    entity = PortfolioHoldingMapping, new = NewPortfolioHoldingMapping, filters = MappingFilters,
    list = portfolio::list_holding_mappings, get = portfolio::get_holding_mapping,
    create = portfolio::create_holding_mappings, update = portfolio::update_holding_mapping,
    delete = portfolio::delete_holding_mapping,
);

crud_resource!(
    PortfolioAssetCategoryMappings, "portfolio_asset_category_mapping",
    entity = PortfolioAssetCategoryMapping, new = NewPortfolioAssetCategoryMapping,
    filters = MappingFilters,
    list = portfolio::list_asset_category_mappings, get = portfolio::get_asset_category_mapping,
    create = portfolio::create_asset_category_mappings,
    update = portfolio::update_asset_category_mapping,
    delete = portfolio::delete_asset_category_mapping,
);
