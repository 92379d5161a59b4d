//! Account and account category repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{Account, AccountCategory, NewAccount, NewAccountCategory};

// ============================================================================
// Account categories
// ============================================================================

const SELECT_ACCOUNT_CATEGORIES: &str = r#"
SELECT
    account_category.account_category_uuid,
    account_category.name AS account_category_name,
    account_category.description AS account_category_description
FROM account_category"#;

const ACCOUNT_CATEGORY_FILTERS: &FilterPredicates<'static> = &[(
    "account_category",
    "account_category.account_category_uuid = ",
)];

impl ColumnValues for NewAccountCategory {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.description.clone().into()]
    }
}

pub async fn create_account_categories(
    pool: &PgPool,
    categories: &[NewAccountCategory],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO account_category (account_category_uuid, name, description)
        VALUES ($1, $2, $3)
        RETURNING account_category_uuid
        "#,
        categories,
    )
    .await
}

pub async fn get_account_category(pool: &PgPool, id: Uuid) -> Result<AccountCategory, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_ACCOUNT_CATEGORIES,
        ACCOUNT_CATEGORY_FILTERS,
        rows::account_category,
        "account_category",
        "account category",
        id,
    )
    .await
}

/// List account categories; filters: `account_category` (id)
pub async fn list_account_categories(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<AccountCategory>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_ACCOUNT_CATEGORIES,
        filters,
        ACCOUNT_CATEGORY_FILTERS,
        rows::account_category,
    )
    .await
}

pub async fn update_account_category(
    pool: &PgPool,
    id: Uuid,
    category: &NewAccountCategory,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE account_category
        SET name = $2, description = $3
        WHERE account_category_uuid = $1
        "#,
        "account category",
        id,
        category,
    )
    .await
}

pub async fn delete_account_category(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM account_category WHERE account_category_uuid = $1",
        "account category",
        id,
    )
    .await
}

// ============================================================================
// Accounts
// ============================================================================

const SELECT_ACCOUNTS: &str = r#"
SELECT
    account.account_uuid,
    account_category.account_category_uuid,
    account_category.name AS account_category_name,
    account_category.description AS account_category_description,
    account.name AS account_name,
    account.description AS account_description,
    account.amount AS account_amount
FROM account
INNER JOIN account_category
    ON account.account_category_uuid = account_category.account_category_uuid"#;

const ACCOUNT_FILTERS: &FilterPredicates<'static> = &[
    ("account", "account.account_uuid = "),
    ("categories", "account_category.name = ANY"),
];

impl ColumnValues for NewAccount {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.category.uuid.into(),
            self.name.clone().into(),
            self.description.clone().into(),
            self.amount.into(),
        ]
    }
}

pub async fn create_accounts(pool: &PgPool, accounts: &[NewAccount]) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO account (account_uuid, account_category_uuid, name, description, amount)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING account_uuid
        "#,
        accounts,
    )
    .await
}

pub async fn get_account(pool: &PgPool, id: Uuid) -> Result<Account, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_ACCOUNTS,
        ACCOUNT_FILTERS,
        rows::account,
        "account",
        "account",
        id,
    )
    .await
}

/// List accounts; filters: `account` (id), `categories` (category names)
pub async fn list_accounts(pool: &PgPool, filters: FilterValues) -> Result<Vec<Account>, PostgresError> {
    fetch_filtered(pool, SELECT_ACCOUNTS, filters, ACCOUNT_FILTERS, rows::account).await
}

pub async fn update_account(pool: &PgPool, id: Uuid, account: &NewAccount) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE account
        SET account_category_uuid = $2, name = $3, description = $4, amount = $5
        WHERE account_uuid = $1
        "#,
        "account",
        id,
        account,
    )
    .await
}

pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(pool, "DELETE FROM account WHERE account_uuid = $1", "account", id).await
}
