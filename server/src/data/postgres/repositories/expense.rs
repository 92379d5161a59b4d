//! Expense and expense category repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::{fetch_by_id, fetch_filtered, rows};
use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    ColumnValues, FilterPredicates, FilterValues, SqlValue, create_and_get_ids, delete_entity,
    update_entity,
};
use crate::data::types::{Expense, ExpenseCategory, NewExpense, NewExpenseCategory};

// ============================================================================
// Expense categories
// ============================================================================

const SELECT_EXPENSE_CATEGORIES: &str = r#"
SELECT
    expense_category.expense_category_uuid,
    expense_category.name AS expense_category_name,
    expense_category.description AS expense_category_description
FROM expense_category"#;

const EXPENSE_CATEGORY_FILTERS: &FilterPredicates<'static> = &[(
    "expense_category",
    "expense_category.expense_category_uuid = ",
)];

impl ColumnValues for NewExpenseCategory {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.description.clone().into()]
    }
}

pub async fn create_expense_categories(
    pool: &PgPool,
    categories: &[NewExpenseCategory],
) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO expense_category (expense_category_uuid, name, description)
        VALUES ($1, $2, $3)
        RETURNING expense_category_uuid
        "#,
        categories,
    )
    .await
}

pub async fn get_expense_category(pool: &PgPool, id: Uuid) -> Result<ExpenseCategory, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_EXPENSE_CATEGORIES,
        EXPENSE_CATEGORY_FILTERS,
        rows::expense_category,
        "expense_category",
        "expense category",
        id,
    )
    .await
}

/// List expense categories; filters: `expense_category` (id)
pub async fn list_expense_categories(
    pool: &PgPool,
    filters: FilterValues,
) -> Result<Vec<ExpenseCategory>, PostgresError> {
    fetch_filtered(
        pool,
        SELECT_EXPENSE_CATEGORIES,
        filters,
        EXPENSE_CATEGORY_FILTERS,
        rows::expense_category,
    )
    .await
}

pub async fn update_expense_category(
    pool: &PgPool,
    id: Uuid,
    category: &NewExpenseCategory,
) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE expense_category
        SET name = $2, description = $3
        WHERE expense_category_uuid = $1
        "#,
        "expense category",
        id,
        category,
    )
    .await
}

pub async fn delete_expense_category(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(
        pool,
        "DELETE FROM expense_category WHERE expense_category_uuid = $1",
        "expense category",
        id,
    )
    .await
}

// ============================================================================
// Expenses
// ============================================================================

const SELECT_EXPENSES: &str = r#"
SELECT
    expense.expense_uuid,
    expense_category.expense_category_uuid,
    expense_category.name AS expense_category_name,
    expense_category.description AS expense_category_description,
    expense.name AS expense_name,
    expense.description AS expense_description,
    expense.date_incurred AS expense_date_incurred,
    expense.amount AS expense_amount
FROM expense
INNER JOIN expense_category
    ON expense.expense_category_uuid = expense_category.expense_category_uuid"#;

const EXPENSE_FILTERS: &FilterPredicates<'static> = &[
    ("categories", "expense_category.name = ANY"),
    ("end", "expense.date_incurred <= "),
    ("expense", "expense.expense_uuid = "),
    ("start", "expense.date_incurred >= "),
];

impl ColumnValues for NewExpense {
    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            self.category.uuid.into(),
            self.name.clone().into(),
            self.description.clone().into(),
            self.date.into(),
            self.amount.into(),
        ]
    }
}

pub async fn create_expenses(pool: &PgPool, expenses: &[NewExpense]) -> Result<Vec<Uuid>, PostgresError> {
    create_and_get_ids(
        pool,
        r#"
        INSERT INTO expense (expense_uuid, expense_category_uuid, name, description, date_incurred, amount)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING expense_uuid
        "#,
        expenses,
    )
    .await
}

pub async fn get_expense(pool: &PgPool, id: Uuid) -> Result<Expense, PostgresError> {
    fetch_by_id(
        pool,
        SELECT_EXPENSES,
        EXPENSE_FILTERS,
        rows::expense,
        "expense",
        "expense",
        id,
    )
    .await
}

/// List expenses
///
/// Filters: `expense` (id), `categories` (category names), `start` and
/// `end` (inclusive dates).
pub async fn list_expenses(pool: &PgPool, filters: FilterValues) -> Result<Vec<Expense>, PostgresError> {
    fetch_filtered(pool, SELECT_EXPENSES, filters, EXPENSE_FILTERS, rows::expense).await
}

pub async fn update_expense(pool: &PgPool, id: Uuid, expense: &NewExpense) -> Result<(), PostgresError> {
    update_entity(
        pool,
        r#"
        UPDATE expense
        SET expense_category_uuid = $2, name = $3, description = $4, date_incurred = $5, amount = $6
        WHERE expense_uuid = $1
        "#,
        "expense",
        id,
        expense,
    )
    .await
}

pub async fn delete_expense(pool: &PgPool, id: Uuid) -> Result<(), PostgresError> {
    delete_entity(pool, "DELETE FROM expense WHERE expense_uuid = $1", "expense", id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::query::get_query_and_values;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_all_filters() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let filters = FilterValues::new()
            .with("start", start)
            .with("categories", vec!["Rent".to_string()])
            .with("expense", Uuid::nil())
            .with("end", NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (sql, args) = get_query_and_values(SELECT_EXPENSES, filters, EXPENSE_FILTERS).unwrap();

        assert!(sql.ends_with(
            "WHERE expense_category.name = ANY($1) AND expense.date_incurred <= $2 \
             AND expense.expense_uuid = $3 AND expense.date_incurred >= $4;"
        ));
        assert_eq!(args[3], SqlValue::Date(start));
    }

    #[test]
    fn test_new_expense_column_order() {
        let category = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2023, 11, 5).unwrap();
        let expense = NewExpense {
            category: category.into(),
            name: "Utilities".to_string(),
            description: String::new(),
            date,
            amount: dec!(120.00),
        };

        let values = expense.column_values();
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], SqlValue::Uuid(category));
        assert_eq!(values[3], SqlValue::Date(date));
    }
}
