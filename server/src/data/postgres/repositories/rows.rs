//! Row decoding for joined SELECTs
//!
//! Every SELECT aliases its columns as `<table>_<column>` (ids keep their
//! natural `<table>_uuid` name) so each nested entity decodes the same way
//! regardless of which query produced the row.

use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::data::types::{
    Account, AccountCategory, AssetCategory, Contribution, Expense, ExpenseCategory, Fund,
    Holding, Portfolio, PortfolioAssetCategoryMapping, PortfolioHoldingMapping,
};

pub(super) fn account_category(row: &PgRow) -> Result<AccountCategory, sqlx::Error> {
    Ok(AccountCategory {
        id: row.try_get("account_category_uuid")?,
        name: row.try_get("account_category_name")?,
        description: row.try_get("account_category_description")?,
    })
}

pub(super) fn account(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("account_uuid")?,
        category: account_category(row)?,
        name: row.try_get("account_name")?,
        description: row.try_get("account_description")?,
        amount: row.try_get("account_amount")?,
    })
}

pub(super) fn asset_category(row: &PgRow) -> Result<AssetCategory, sqlx::Error> {
    Ok(AssetCategory {
        id: row.try_get("asset_category_uuid")?,
        name: row.try_get("asset_category_name")?,
        description: row.try_get("asset_category_description")?,
    })
}

pub(super) fn fund(row: &PgRow) -> Result<Fund, sqlx::Error> {
    Ok(Fund {
        id: row.try_get("fund_uuid")?,
        category: asset_category(row)?,
        name: row.try_get("fund_name")?,
        ticker_symbol: row.try_get("fund_ticker_symbol")?,
        share_price: row.try_get("fund_share_price")?,
        expense_ratio: row.try_get("fund_expense_ratio")?,
    })
}

pub(super) fn holding(row: &PgRow) -> Result<Holding, sqlx::Error> {
    Ok(Holding::new(
        row.try_get("holding_uuid")?,
        account(row)?,
        fund(row)?,
        row.try_get("holding_shares")?,
    ))
}

pub(super) fn portfolio(row: &PgRow) -> Result<Portfolio, sqlx::Error> {
    Ok(Portfolio {
        id: row.try_get("portfolio_uuid")?,
        name: row.try_get("portfolio_name")?,
        description: row.try_get("portfolio_description")?,
    })
}

pub(super) fn portfolio_holding_mapping(row: &PgRow) -> Result<PortfolioHoldingMapping, sqlx::Error> {
    Ok(PortfolioHoldingMapping {
        id: row.try_get("portfolio_holding_mapping_uuid")?,
        portfolio: portfolio(row)?,
        holding: holding(row)?,
    })
}

pub(super) fn portfolio_asset_category_mapping(
    row: &PgRow,
) -> Result<PortfolioAssetCategoryMapping, sqlx::Error> {
    Ok(PortfolioAssetCategoryMapping {
        id: row.try_get("portfolio_asset_category_mapping_uuid")?,
        portfolio: portfolio(row)?,
        asset_category: asset_category(row)?,
        percentage: row.try_get("portfolio_asset_category_mapping_percentage")?,
    })
}

pub(super) fn contribution(row: &PgRow) -> Result<Contribution, sqlx::Error> {
    Ok(Contribution {
        id: row.try_get("contribution_uuid")?,
        account: account(row)?,
        name: row.try_get("contribution_name")?,
        description: row.try_get("contribution_description")?,
        date: row.try_get("contribution_date_made")?,
        amount: row.try_get("contribution_amount")?,
    })
}

pub(super) fn expense_category(row: &PgRow) -> Result<ExpenseCategory, sqlx::Error> {
    Ok(ExpenseCategory {
        id: row.try_get("expense_category_uuid")?,
        name: row.try_get("expense_category_name")?,
        description: row.try_get("expense_category_description")?,
    })
}

pub(super) fn expense(row: &PgRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: row.try_get("expense_uuid")?,
        category: expense_category(row)?,
        name: row.try_get("expense_name")?,
        description: row.try_get("expense_description")?,
        date: row.try_get("expense_date_incurred")?,
        amount: row.try_get("expense_amount")?,
    })
}
