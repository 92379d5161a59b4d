//! Contribution repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{Contribution, NewContribution};

const SELECT_CONTRIBUTIONS: &str = r#"
SELECT
    contribution.contribution_uuid,
    account.account_uuid,
    account_category.account_category_uuid,
    account_category.name AS account_category_name,
    account_category.description AS account_category_description,
    account.name AS account_name,
    account.description AS account_description,
    account.amount AS account_amount,
    contribution.name AS contribution_name,
    contribution.description AS contribution_description,
    contribution.date_made AS contribution_date_made,
    contribution.amount AS contribution_amount
FROM contribution
INNER JOIN account
    ON contribution.account_uuid = account.account_uuid
INNER JOIN account_category
    ON account.account_category_uuid = account_category.account_category_uuid"#;

const CONTRIBUTION_FILTERS: &FilterPredicates<'static> = &[
    ("accounts", "account.name = ANY"),
    ("contribution", "contribution.contribution_uuid = "),
    ("end", "contribution.date_made <= "),
    ("start", "contribution.date_made >= "),
];

impl ColumnValues for NewContribution {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.account.uuid.into(),
            self.name.clone().into(),
            self.description.clone().into(),
            self.date.into(),
            self.amount.into(),
        ]
    }
}

pub async fn create_contributions(
    pool: &PgPool,
    contributions: &[NewContribution],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO contribution (contribution_uuid, account_uuid, name, description, date_made, amount)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING contribution_uuid
        "#,
        contributions,
    )
    .await
}

pub async fn get_contribution(pool: &PgPool, id: Uuid) -> Result<Contribution, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_CONTRIBUTIONS,
        CONTRIBUTION_FILTERS,
        rows::contribution,
        "contribution",
        "contribution",
        id,
    )
    .await
}

/// List contributions
///
/// Filters: `contribution` (id), `accounts` (account names), `start` and
/// `end` (inclusive dates).
pub async fn list_contributions(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<Contribution>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_CONTRIBUTIONS,
        filters,
        CONTRIBUTION_FILTERS,
        rows::contribution,
    )
    .await
}

pub async fn update_contribution(
    pool: &PgPool,
    id: Uuid,
    contribution: &NewContribution,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE contribution
        SET account_uuid = $2, name = $3, description = $4, date_made = $5, amount = $6
        WHERE contribution_uuid = $1
        "#,
        "contribution",
        id,
        contribution,
    )
    .await
}

pub async fn delete_contribution(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM contribution WHERE contribution_uuid = $1",
        "contribution",
        id,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::query::get_query_and_values;
    use chrono::NaiveDate;

    #[test]
    fn test_contribution_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let filters = FilterValues::new().with("start", start).with("end", end);

        let (sql, args) =
            get_query_and_values(SELECT_CONTRIBUTIONS, filters, CONTRIBUTION_FILTERS).unwrap();

        assert!(sql.ends_with(
            "WHERE contribution.date_made <= $1 AND contribution.date_made >= $2;"
        ));
        assert_eq!(args, vec![SqlValue::Date(end), SqlValue::Date(start)]);
    }

    #[test]
    fn test_contribution_accounts_filter() {
        let filters = FilterValues::new()
            .with("accounts", vec!["Roth IRA".to_string(), "401k".to_string()]);

        let (sql, _) =
            get_query_and_values(SELECT_CONTRIBUTIONS, filters, CONTRIBUTION_FILTERS).unwrap();

        assert!(sql.ends_with("WHERE account.name = ANY($1);"));
    }
}
