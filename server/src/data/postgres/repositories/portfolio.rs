//! Portfolio repository for PostgreSQL operations
//!
//! Covers portfolios themselves plus their two mapping tables: holdings in a
//! portfolio and target allocation per asset category.

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{
    NewPortfolio, NewPortfolioAssetCategoryMapping, NewPortfolioHoldingMapping, Portfolio,
    PortfolioAssetCategoryMapping, PortfolioHoldingMapping,
};

// ============================================================================
// Portfolios
// ============================================================================

const SELECT_PORTFOLIOS: &str = r#"
SELECT
    portfolio.portfolio_uuid,
    portfolio.name AS portfolio_name,
    portfolio.description AS portfolio_description
FROM portfolio"#;

const PORTFOLIO_FILTERS: &FilterPredicates<'static> =
    &[("portfolio", "portfolio.portfolio_uuid = ")];

impl ColumnValues for NewPortfolio {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.description.clone().into()]
    }
}

pub async fn create_portfolios(
    pool: &PgPool,
    portfolios: &[NewPortfolio],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO portfolio (portfolio_uuid, name, description)
        VALUES ($1, $2, $3)
        RETURNING portfolio_uuid
        "#,
        portfolios,
    )
    .await
}

pub async fn get_portfolio(pool: &PgPool, id: Uuid) -> Result<Portfolio, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_PORTFOLIOS,
        PORTFOLIO_FILTERS,
        rows::portfolio,
        "portfolio",
        "portfolio",
        id,
    )
    .await
}

/// List portfolios; filters: `portfolio` (id)
pub async fn list_portfolios(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<Portfolio>, PostgresError> {
    fetch_filtered(pool, SELECT_PORTFOLIOS, filters, PORTFOLIO_FILTERS, rows::portfolio).await
}

pub async fn update_portfolio(
    pool: &PgPool,
    id: Uuid,
    portfolio: &NewPortfolio,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE portfolio
        SET name = $2, description = $3
        WHERE portfolio_uuid = $1
        "#,
        "portfolio",
        id,
        portfolio,
    )
    .await
}

pub async fn delete_portfolio(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM portfolio WHERE portfolio_uuid = $1",
        "portfolio",
        id,
    )
    .await
}

// ============================================================================
// Holding mappings
// ============================================================================

const SELECT_HOLDING_MAPPINGS: &str = r#"
SELECT
    portfolio_holding_mapping.portfolio_holding_mapping_uuid,
    portfolio.portfolio_uuid,
    portfolio.name AS portfolio_name,
    portfolio.description AS portfolio_description,
    holding.holding_uuid,
    account.account_uuid,
    account_category.account_category_uuid,
    account_category.name AS account_category_name,
    account_category.description AS account_category_description,
    account.name AS account_name,
    account.description AS account_description,
    account.amount AS account_amount,
    fund.fund_uuid,
    asset_category.asset_category_uuid,
    asset_category.name AS asset_category_name,
    asset_category.description AS asset_category_description,
    fund.name AS fund_name,
    fund.ticker_symbol AS fund_ticker_symbol,
    fund.share_price AS fund_share_price,
    fund.expense_ratio AS fund_expense_ratio,
    holding.shares AS holding_shares
FROM portfolio_holding_mapping
INNER JOIN portfolio
    ON portfolio_holding_mapping.portfolio_uuid = portfolio.portfolio_uuid
INNER JOIN holding
    ON portfolio_holding_mapping.holding_uuid = holding.holding_uuid
INNER JOIN account
    ON holding.account_uuid = account.account_uuid
INNER JOIN account_category
    ON account.account_category_uuid = account_category.account_category_uuid
INNER JOIN fund
    ON holding.fund_uuid = fund.fund_uuid
INNER JOIN asset_category
    ON fund.asset_category_uuid = asset_category.asset_category_uuid"#;

const HOLDING_MAPPING_FILTERS: &FilterPredicates<'static> = &[
    (
        "mapping",
        "portfolio_holding_mapping.portfolio_holding_mapping_uuid = ",
    ),
    ("portfolios", "portfolio.portfolio_uuid = ANY"),
];

impl ColumnValues for NewPortfolioHoldingMapping {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![self.portfolio.uuid.into(), self.holding.uuid.into()]
    }
}

pub async fn create_holding_mappings(
    pool: &PgPool,
    mappings: &[NewPortfolioHoldingMapping],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO portfolio_holding_mapping (portfolio_holding_mapping_uuid, portfolio_uuid, holding_uuid)
        VALUES ($1, $2, $3)
        RETURNING portfolio_holding_mapping_uuid
        "#,
        mappings,
    )
    .await
}

pub async fn get_holding_mapping(
    pool: &PgPool,
    id: Uuid,
) -> Result<PortfolioHoldingMapping, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_HOLDING_MAPPINGS,
        HOLDING_MAPPING_FILTERS,
        rows::portfolio_holding_mapping,
        "mapping",
        "portfolio holding mapping",
        id,
    )
    .await
}

/// List holding mappings; filters: `mapping` (id), `portfolios` (ids)
pub async fn list_holding_mappings(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<PortfolioHoldingMapping>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_HOLDING_MAPPINGS,
        filters,
        HOLDING_MAPPING_FILTERS,
        rows::portfolio_holding_mapping,
    )
    .await
}

pub async fn update_holding_mapping(
    pool: &PgPool,
    id: Uuid,
    mapping: &NewPortfolioHoldingMapping,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE portfolio_holding_mapping
        SET portfolio_uuid = $2, holding_uuid = $3
        WHERE portfolio_holding_mapping_uuid = $1
        "#,
        "portfolio holding mapping",
        id,
        mapping,
    )
    .await
}

pub async fn delete_holding_mapping(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM portfolio_holding_mapping WHERE portfolio_holding_mapping_uuid = $1",
        "portfolio holding mapping",
        id,
    )
    .await
}

// ============================================================================
// Asset category mappings
// ============================================================================

const SELECT_ASSET_CATEGORY_MAPPINGS: &str = r#"
SELECT
    portfolio_asset_category_mapping.portfolio_asset_category_mapping_uuid,
    portfolio.portfolio_uuid,
    portfolio.name AS portfolio_name,
    portfolio.description AS portfolio_description,
    asset_category.asset_category_uuid,
    asset_category.name AS asset_category_name,
    asset_category.description AS asset_category_description,
    portfolio_asset_category_mapping.percentage AS portfolio_asset_category_mapping_percentage
FROM portfolio_asset_category_mapping
INNER JOIN portfolio
    ON portfolio_asset_category_mapping.portfolio_uuid = portfolio.portfolio_uuid
INNER JOIN asset_category
    ON portfolio_asset_category_mapping.asset_category_uuid = asset_category.asset_category_uuid"#;

const ASSET_CATEGORY_MAPPING_FILTERS: &FilterPredicates<'static> = &[
    (
        "mapping",
        "portfolio_asset_category_mapping.portfolio_asset_category_mapping_uuid = ",
    ),
    ("portfolios", "portfolio.portfolio_uuid = ANY"),
];

impl ColumnValues for NewPortfolioAssetCategoryMapping {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.portfolio.uuid.into(),
            self.asset_category.uuid.into(),
            self.percentage.into(),
        ]
    }
}

pub async fn create_asset_category_mappings(
    pool: &PgPool,
    mappings: &[NewPortfolioAssetCategoryMapping],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO portfolio_asset_category_mapping
            (portfolio_asset_category_mapping_uuid, portfolio_uuid, asset_category_uuid, percentage)
        VALUES ($1, $2, $3, $4)
        RETURNING portfolio_asset_category_mapping_uuid
        "#,
        mappings,
    )
    .await
}

pub async fn get_asset_category_mapping(
    pool: &PgPool,
    id: Uuid,
) -> Result<PortfolioAssetCategoryMapping, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_ASSET_CATEGORY_MAPPINGS,
        ASSET_CATEGORY_MAPPING_FILTERS,
        rows::portfolio_asset_category_mapping,
        "mapping",
        "portfolio asset category mapping",
        id,
    )
    .await
}

/// List asset category mappings; filters: `mapping` (id), `portfolios` (ids)
pub async fn list_asset_category_mappings(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<PortfolioAssetCategoryMapping>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_ASSET_CATEGORY_MAPPINGS,
        filters,
        ASSET_CATEGORY_MAPPING_FILTERS,
        rows::portfolio_asset_category_mapping,
    )
    .await
}

pub async fn update_asset_category_mapping(
    pool: &PgPool,
    id: Uuid,
    mapping: &NewPortfolioAssetCategoryMapping,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE portfolio_asset_category_mapping
        SET portfolio_uuid = $2, asset_category_uuid = $3, percentage = $4
        WHERE portfolio_asset_category_mapping_uuid = $1
        "#,
        "portfolio asset category mapping",
        id,
        mapping,
    )
    .await
}

pub async fn delete_asset_category_mapping(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM portfolio_asset_category_mapping WHERE portfolio_asset_category_mapping_uuid = $1",
        "portfolio asset category mapping",
        id,
    )
    .await
}
