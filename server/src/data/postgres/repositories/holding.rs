//! Holding repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{Holding, NewHolding};

const SELECT_HOLDINGS: &str = r#"
SELECT
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
FROM holding
INNER JOIN account
    ON holding.account_uuid = account.account_uuid
INNER JOIN account_category
    ON account.account_category_uuid = account_category.account_category_uuid
INNER JOIN fund
    ON holding.fund_uuid = fund.fund_uuid
INNER JOIN asset_category
    ON fund.asset_category_uuid = asset_category.asset_category_uuid"#;

const HOLDING_FILTERS: &FilterPredicates<'static> = &[
    ("accounts", "account.account_uuid = ANY"),
    ("funds", "fund.fund_uuid = ANY"),
    ("holding", "holding.holding_uuid = "),
];

impl ColumnValues for NewHolding {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.account.uuid.into(),
            self.fund.uuid.into(),
            self.shares.into(),
        ]
    }
}

pub async fn create_holdings(pool: &PgPool, holdings: &[NewHolding]) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO holding (holding_uuid, account_uuid, fund_uuid, shares)
        VALUES ($1, $2, $3, $4)
        RETURNING holding_uuid
        "#,
        holdings,
    )
    .await
}

pub async fn get_holding(pool: &PgPool, id: Uuid) -> Result<Holding, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_HOLDINGS,
        HOLDING_FILTERS,
        rows::holding,
        "holding",
        "holding",
        id,
    )
    .await
}

/// List holdings; filters: `holding` (id), `accounts` (ids), `funds` (ids)
pub async fn list_holdings(pool: &PgPool, filters: FilterValues) -> Result<Vec<Holding>, PostgresError> {
    fetch_filtered(pool, SELECT_HOLDINGS, filters, HOLDING_FILTERS, rows::holding).await
}

pub async fn update_holding(pool: &PgPool, id: Uuid, holding: &NewHolding) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE holding
        SET account_uuid = $2, fund_uuid = $3, shares = $4
        WHERE holding_uuid = $1
        "#,
        "holding",
        id,
        holding,
    )
    .await
}

pub async fn delete_holding(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(pool, "DELETE FROM holding WHERE holding_uuid = $1", "holding", id).await
}
