//! Fund and asset category repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{AssetCategory, Fund, NewAssetCategory, NewFund};

// ============================================================================
// Asset categories
// ============================================================================

const SELECT_ASSET_CATEGORIES: &str = r#"
SELECT
    asset_category.asset_category_uuid,
    asset_category.name AS asset_category_name,
    asset_category.description AS asset_category_description
FROM asset_category"#;

const ASSET_CATEGORY_FILTERS: &FilterPredicates<'static> =
    &[("asset_category", "asset_category.asset_category_uuid = ")];

impl ColumnValues for NewAssetCategory {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.description.clone().into()]
    }
}

pub async fn create_asset_categories(
    pool: &PgPool,
    categories: &[NewAssetCategory],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO asset_category (asset_category_uuid, name, description)
        VALUES ($1, $2, $3)
        RETURNING asset_category_uuid
        "#,
        categories,
    )
    .await
}

pub async fn get_asset_category(pool: &PgPool, id: Uuid) -> Result<AssetCategory, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_ASSET_CATEGORIES,
        ASSET_CATEGORY_FILTERS,
        rows::asset_category,
        "asset_category",
        "asset category",
        id,
    )
    .await
}

/// List asset categories; filters: `asset_category` (id)
pub async fn list_asset_categories(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<AssetCategory>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_ASSET_CATEGORIES,
        filters,
        ASSET_CATEGORY_FILTERS,
        rows::asset_category,
    )
    .await
}

pub async fn update_asset_category(
    pool: &PgPool,
    id: Uuid,
    category: &NewAssetCategory,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE asset_category
        SET name = $2, description = $3
        WHERE asset_category_uuid = $1
        "#,
        "asset category",
        id,
        category,
    )
    .await
}

pub async fn delete_asset_category(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM asset_category WHERE asset_category_uuid = $1",
        "asset category",
        id,
    )
    .await
}

// ============================================================================
// Funds
// ============================================================================

const SELECT_FUNDS: &str = r#"
SELECT
    fund.fund_uuid,
    asset_category.asset_category_uuid,
    asset_category.name AS asset_category_name,
    asset_category.description AS asset_category_description,
    fund.name AS fund_name,
    fund.ticker_symbol AS fund_ticker_symbol,
    fund.share_price AS fund_share_price,
    fund.expense_ratio AS fund_expense_ratio
FROM fund
INNER JOIN asset_category
    ON fund.asset_category_uuid = asset_category.asset_category_uuid"#;

const FUND_FILTERS: &FilterPredicates<'static> = &[
    ("categories", "asset_category.name = ANY"),
    ("fund", "fund.fund_uuid = "),
];

impl ColumnValues for NewFund {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.category.uuid.into(),
            self.name.clone().into(),
            self.ticker_symbol.clone().into(),
            self.share_price.into(),
            self.expense_ratio.into(),
        ]
    }
}

pub async fn create_funds(pool: &PgPool, funds: &[NewFund]) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO fund (fund_uuid, asset_category_uuid, name, ticker_symbol, share_price, expense_ratio)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING fund_uuid
        "#,
        funds,
    )
    .await
}

pub async fn get_fund(pool: &PgPool, id: Uuid) -> Result<Fund, PostgresError> {
    fetch_by_id(pool, SELECT_FUNDS, FUND_FILTERS, rows::fund, "fund", "fund", id).await
}

/// List funds; filters: `fund` (id), `categories` (asset category names)
pub async fn list_funds(pool: &PgPool, filters: FilterValues) -> Result<Vec<Fund>, PostgresError> {
    fetch_filtered(pool, SELECT_FUNDS, filters, FUND_FILTERS, rows::fund).await
}

pub async fn update_fund(pool: &PgPool, id: Uuid, fund: &NewFund) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE fund
        SET asset_category_uuid = $2, name = $3, ticker_symbol = $4, share_price = $5, expense_ratio = $6
        WHERE fund_uuid = $1
        "#,
        "fund",
        id,
        fund,
    )
    .await
}

pub async fn delete_fund(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(pool, "DELETE FROM fund WHERE fund_uuid = $1", "fund", id).await
}
