//! Query construction helpers
//!
//! Every list query in the repositories is a fixed `SELECT` prefix plus a
//! WHERE clause assembled here from named filters. Each repository declares
//! its filters statically as `(name, predicate)` pairs; callers supply the
//! runtime values by name.
//!
//! Filter values are kept in a [`BTreeMap`], so predicates are emitted in
//! lexicographic order of filter name and `$N` always refers to the Nth
//! returned value.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};
use thiserror::Error;
use uuid::Uuid;

use super::PostgresError;

/// Clause emitted when no filters are supplied.
pub const EMPTY_CLAUSE: &str = " ;";

/// Static filter declaration: `(filter name, SQL predicate prefix)`.
pub type FilterPredicates<'a> = [(&'a str, &'a str)];

/// Error raised while assembling a WHERE clause
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("Filter '{0}' has no mapped predicate")]
    UnmappedFilter(String),
}

/// A value bound out-of-band to a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    TextList(Vec<String>),
    UuidList(Vec<Uuid>),
}

impl SqlValue {
    /// Set-valued values bind as a single Postgres array
    pub fn is_list(&self) -> bool {
        matches!(self, Self::TextList(_) | Self::UuidList(_))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Vec<String>> for SqlValue {
    fn from(v: Vec<String>) -> Self {
        Self::TextList(v)
    }
}

impl From<Vec<Uuid>> for SqlValue {
    fn from(v: Vec<Uuid>) -> Self {
        Self::UuidList(v)
    }
}

/// Runtime filter values keyed by filter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterValues(BTreeMap<String, SqlValue>);

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value, returning the previous value for `name` if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Option<SqlValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for FilterValues
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn predicate_for<'a>(predicates: &FilterPredicates<'a>, name: &str) -> Option<&'a str> {
    predicates
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, predicate)| *predicate)
}

/// Build a parameterized WHERE clause from filter values
///
/// Each value is emitted as `<predicate>$N` (or `<predicate>($N)` for list
/// values, whose predicates end in `= ANY`), joined with `AND`, prefixed with
/// `WHERE` and terminated by `;`. With no values the clause is [`EMPTY_CLAUSE`].
///
/// Fails with [`QueryBuildError::UnmappedFilter`] if any value names a filter
/// absent from `predicates`; nothing is returned in that case.
pub fn build_query_clauses(
    values: FilterValues,
    predicates: &FilterPredicates<'_>,
) -> Result<(String, Vec<SqlValue>), QueryBuildError> {
    let mut conditions = Vec::with_capacity(values.len());
    let mut bound = Vec::with_capacity(values.len());

    for (name, value) in values.0 {
        let Some(predicate) = predicate_for(predicates, &name) else {
            return Err(QueryBuildError::UnmappedFilter(name));
        };

        let placeholder = bound.len() + 1;
        if value.is_list() {
            conditions.push(format!("{predicate}(${placeholder})"));
        } else {
            conditions.push(format!("{predicate}${placeholder}"));
        }
        bound.push(value);
    }

    if conditions.is_empty() {
        return Ok((EMPTY_CLAUSE.to_string(), bound));
    }

    Ok((format!("WHERE {};", conditions.join(" AND ")), bound))
}

/// Append the clause built from `values` to a fixed query prefix
pub fn get_query_and_values(
    base: &str,
    values: FilterValues,
    predicates: &FilterPredicates<'_>,
) -> Result<(String, Vec<SqlValue>), QueryBuildError> {
    let (clause, args) = build_query_clauses(values, predicates)?;
    Ok((format!("{}\n{}", base.trim_end(), clause), args))
}

// ============================================================================
// Binding
// ============================================================================

/// Bind [`SqlValue`]s onto a Postgres query in placeholder order
pub trait BindValues: Sized {
    fn bind_value(self, value: SqlValue) -> Self;

    fn bind_values(self, values: Vec<SqlValue>) -> Self {
        values.into_iter().fold(self, Self::bind_value)
    }
}

macro_rules! bind_sql_value {
    ($query:expr, $value:expr) => {
        match $value {
            SqlValue::Text(v) => $query.bind(v),
            SqlValue::Integer(v) => $query.bind(v),
            SqlValue::Float(v) => $query.bind(v),
            SqlValue::Decimal(v) => $query.bind(v),
            SqlValue::Date(v) => $query.bind(v),
            SqlValue::Timestamp(v) => $query.bind(v),
            SqlValue::Uuid(v) => $query.bind(v),
            SqlValue::TextList(v) => $query.bind(v),
            SqlValue::UuidList(v) => $query.bind(v),
        }
    };
}

impl<'q> BindValues for Query<'q, Postgres, PgArguments> {
    fn bind_value(self, value: SqlValue) -> Self {
        bind_sql_value!(self, value)
    }
}

impl<'q, O> BindValues for QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_value(self, value: SqlValue) -> Self {
        bind_sql_value!(self, value)
    }
}

impl<'q, O> BindValues for QueryScalar<'q, Postgres, O, PgArguments> {
    fn bind_value(self, value: SqlValue) -> Self {
        bind_sql_value!(self, value)
    }
}

// ============================================================================
// Write helpers
// ============================================================================

/// Explicit column mapping for a writable entity
///
/// Statements bind the entity key as `$1` followed by these values as
/// `$2..`, in the order returned here. Insert and update statements for an
/// entity must list their columns in the same order.
pub trait ColumnValues {
    fn column_values(&self) -> Vec<SqlValue>;
}

fn keyed_values<E: ColumnValues>(id: Uuid, entity: &E) -> Vec<SqlValue> {
    let columns = entity.column_values();
    let mut values = Vec::with_capacity(columns.len() + 1);
    values.push(SqlValue::Uuid(id));
    values.extend(columns);
    values
}

/// Insert each entity with a fresh id and collect the returned ids in input order
///
/// `query` must be an `INSERT ... RETURNING <key>` statement. Rows are
/// written one statement at a time; the first failure aborts the batch and
/// rows already written stay written.
pub async fn create_and_get_ids<E: ColumnValues>(
    pool: &PgPool,
    query: &str,
    entities: &[E],
) -> Result<Vec<Uuid>, PostgresError> {
    insert_each(entities, move |values| async move {
        sqlx::query_scalar::<_, Uuid>(query)
            .bind_values(values)
            .fetch_one(pool)
            .await
            .map_err(PostgresError::from)
    })
    .await
}

/// Drive `insert_row` over the batch, one keyed row at a time
async fn insert_each<E, F, Fut>(
    entities: &[E],
    mut insert_row: F,
) -> Result<Vec<Uuid>, PostgresError>
where
    E: ColumnValues,
    F: FnMut(Vec<SqlValue>) -> Fut,
    Fut: Future<Output = Result<Uuid, PostgresError>>,
{
    let mut ids = Vec::with_capacity(entities.len());

    for (index, entity) in entities.iter().enumerate() {
        let id = insert_row(keyed_values(Uuid::new_v4(), entity))
            .await
            .inspect_err(|e| {
                tracing::warn!(index, written = ids.len(), error = %e, "Batch insert aborted");
            })?;
        ids.push(id);
    }

    tracing::debug!(count = ids.len(), "Batch insert complete");
    Ok(ids)
}

/// Run an `UPDATE ... WHERE <key> = $1` statement for one entity
pub async fn update_entity<E: ColumnValues>(
    pool: &PgPool,
    query: &str,
    entity_name: &'static str,
    id: Uuid,
    entity: &E,
) -> Result<(), PostgresError> {
    let result = sqlx::query(query)
        .bind_values(keyed_values(id, entity))
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PostgresError::NotFound {
            entity: entity_name,
            id,
        });
    }
    Ok(())
}

/// Run a `DELETE ... WHERE <key> = $1` statement
pub async fn delete_entity(
    pool: &PgPool,
    query: &str,
    entity_name: &'static str,
    id: Uuid,
) -> Result<(), PostgresError> {
    let result = sqlx::query(query).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(PostgresError::NotFound {
            entity: entity_name,
            id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn placeholder_index(clause: &str, fragment: &str) -> usize {
        let start = clause.find(fragment).expect("fragment present") + fragment.len();
        let digits: String = clause[start..]
            .trim_start_matches(['$', '('])
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().expect("placeholder number")
    }

    #[test]
    fn test_build_query_clauses_single_filter() {
        let values = FilterValues::new().with("category", "foo");
        let predicates = [("category", "account_category.name = ")];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        assert_eq!(clause, "WHERE account_category.name = $1;");
        assert_eq!(args, vec![SqlValue::Text("foo".to_string())]);
    }

    #[test]
    fn test_build_query_clauses_ignores_unused_predicates() {
        let values = FilterValues::new().with("amount", 12.5);
        let predicates = [
            ("amount", "foo.amount = "),
            ("category", "test_category.filter >= "),
        ];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        assert_eq!(clause, "WHERE foo.amount = $1;");
        assert_eq!(args, vec![SqlValue::Float(12.5)]);
    }

    #[test]
    fn test_build_query_clauses_empty() {
        let (clause, args) = build_query_clauses(FilterValues::new(), &[]).unwrap();

        assert_eq!(clause, " ;");
        assert!(args.is_empty());
    }

    #[test]
    fn test_build_query_clauses_empty_values_with_predicates() {
        let predicates = [("category", "account_category.name = ")];
        let (clause, args) = build_query_clauses(FilterValues::new(), &predicates).unwrap();

        assert_eq!(clause, EMPTY_CLAUSE);
        assert!(args.is_empty());
    }

    #[test]
    fn test_build_query_clauses_multiple_filters() {
        let now = Utc::now();
        let values = FilterValues::new()
            .with("category", "foo")
            .with("amount", 45i64)
            .with("start", now);
        let predicates = [
            ("category", "account_category.name = "),
            ("amount", "test.amount >= "),
            ("start", "time.date_started <= "),
        ];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        assert_eq!(args.len(), 3);
        for (_, predicate) in predicates {
            assert_eq!(clause.matches(predicate).count(), 1, "{predicate} in {clause}");
        }
        for n in 1..=3 {
            assert!(clause.contains(&format!("${n}")), "${n} in {clause}");
        }
        assert!(!clause.contains("$4"));
        assert_eq!(clause.matches(" AND ").count(), 2);
        assert!(clause.starts_with("WHERE "));
        assert!(clause.ends_with(';'));
    }

    #[test]
    fn test_build_query_clauses_placeholders_align_with_values() {
        let account = Uuid::new_v4();
        let values = FilterValues::new()
            .with("start", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with("account", account)
            .with("amount", dec!(100.25))
            .with("name", "Roth IRA");
        let predicates = [
            ("account", "account.account_uuid = "),
            ("amount", "account.amount >= "),
            ("name", "account.name = "),
            ("start", "contribution.date_made >= "),
        ];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        let expected: [(&str, SqlValue); 4] = [
            ("account.account_uuid = ", SqlValue::Uuid(account)),
            ("account.amount >= ", SqlValue::Decimal(dec!(100.25))),
            ("account.name = ", SqlValue::Text("Roth IRA".to_string())),
            (
                "contribution.date_made >= ",
                SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ),
        ];
        for (predicate, value) in expected {
            let n = placeholder_index(&clause, predicate);
            assert_eq!(args[n - 1], value, "placeholder ${n} for {predicate}");
        }
    }

    #[test]
    fn test_build_query_clauses_is_ordered_by_filter_name() {
        let values = FilterValues::new()
            .with("start", "2024-01-01")
            .with("category", "foo")
            .with("amount", 45i64);
        let predicates = [
            ("category", "account_category.name = "),
            ("amount", "test.amount >= "),
            ("start", "time.date_started <= "),
        ];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        assert_eq!(
            clause,
            "WHERE test.amount >= $1 AND account_category.name = $2 AND time.date_started <= $3;"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::Integer(45),
                SqlValue::Text("foo".to_string()),
                SqlValue::Text("2024-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_query_clauses_list_value_binds_once() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let values = FilterValues::new()
            .with("portfolios", ids.clone())
            .with("mapping", Uuid::nil());
        let predicates = [
            ("mapping", "portfolio_holding_mapping.portfolio_holding_mapping_uuid = "),
            ("portfolios", "portfolio.portfolio_uuid = ANY"),
        ];

        let (clause, args) = build_query_clauses(values, &predicates).unwrap();

        assert_eq!(
            clause,
            "WHERE portfolio_holding_mapping.portfolio_holding_mapping_uuid = $1 \
             AND portfolio.portfolio_uuid = ANY($2);"
        );
        assert_eq!(args, vec![SqlValue::Uuid(Uuid::nil()), SqlValue::UuidList(ids)]);
    }

    #[test]
    fn test_build_query_clauses_unmapped_filter() {
        let values = FilterValues::new().with("category", "foo");
        let predicates = [("otherCat", "account_category.name = ")];

        let err = build_query_clauses(values, &predicates).unwrap_err();

        assert_eq!(err, QueryBuildError::UnmappedFilter("category".to_string()));
    }

    #[test]
    fn test_build_query_clauses_unmapped_among_mapped() {
        let values = FilterValues::new()
            .with("category", "foo")
            .with("otherCat", 15i64);
        let predicates = [("otherCat", "account_category.name = ")];

        let err = build_query_clauses(values, &predicates).unwrap_err();

        assert_eq!(err, QueryBuildError::UnmappedFilter("category".to_string()));
    }

    #[test]
    fn test_build_query_clauses_unmapped_after_mapped() {
        // "zzz" sorts after the mapped filter, so a fragment was already emitted
        let values = FilterValues::new()
            .with("amount", 1i64)
            .with("zzz", "x");
        let predicates = [("amount", "foo.amount = ")];

        let err = build_query_clauses(values, &predicates).unwrap_err();

        assert_eq!(err, QueryBuildError::UnmappedFilter("zzz".to_string()));
    }

    #[test]
    fn test_unmapped_filter_error_display() {
        let err = QueryBuildError::UnmappedFilter("category".to_string());
        assert_eq!(err.to_string(), "Filter 'category' has no mapped predicate");
    }

    #[test]
    fn test_get_query_and_values_appends_clause() {
        let values = FilterValues::new().with("portfolio", Uuid::nil());
        let predicates = [("portfolio", "portfolio.portfolio_uuid = ")];

        let (query, args) =
            get_query_and_values("SELECT portfolio_uuid FROM portfolio\n", values, &predicates)
                .unwrap();

        assert_eq!(
            query,
            "SELECT portfolio_uuid FROM portfolio\nWHERE portfolio.portfolio_uuid = $1;"
        );
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_get_query_and_values_without_filters() {
        let (query, args) =
            get_query_and_values("SELECT name FROM fund", FilterValues::new(), &[]).unwrap();

        assert_eq!(query, "SELECT name FROM fund\n ;");
        assert!(args.is_empty());
    }

    #[test]
    fn test_filter_values_collect_and_replace() {
        let mut values: FilterValues = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(values.len(), 2);

        let previous = values.insert("a", 3i64);
        assert_eq!(previous, Some(SqlValue::Integer(1)));
        assert_eq!(values.len(), 2);

        let names: Vec<&str> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_sql_value_is_list() {
        assert!(SqlValue::from(vec![Uuid::nil()]).is_list());
        assert!(SqlValue::from(vec!["a".to_string()]).is_list());
        assert!(!SqlValue::from("a").is_list());
        assert!(!SqlValue::from(Uuid::nil()).is_list());
    }

    struct Row {
        name: &'static str,
        amount: Decimal,
    }

    impl ColumnValues for Row {
        fn column_values(&self) -> Vec<SqlValue> {
            vec![self.name.into(), self.amount.into()]
        }
    }

    #[test]
    fn test_keyed_values_puts_key_first() {
        let id = Uuid::new_v4();
        let row = Row {
            name: "Brokerage",
            amount: dec!(10),
        };

        assert_eq!(
            keyed_values(id, &row),
            vec![
                SqlValue::Uuid(id),
                SqlValue::Text("Brokerage".to_string()),
                SqlValue::Decimal(dec!(10)),
            ]
        );
    }

    fn rows(names: &[&'static str]) -> Vec<Row> {
        names
            .iter()
            .map(|&name| Row {
                name,
                amount: dec!(1),
            })
            .collect()
    }

    fn key_of(values: &[SqlValue]) -> Uuid {
        match values.first() {
            Some(SqlValue::Uuid(id)) => *id,
            other => panic!("expected key first, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_each_returns_ids_in_input_order() {
        let entities = rows(&["Checking", "Savings", "Brokerage"]);
        let mut written = Vec::new();

        let ids = insert_each(&entities, |values| {
            written.push(values.clone());
            std::future::ready(Ok(key_of(&values)))
        })
        .await
        .unwrap();

        assert_eq!(ids.len(), 3);
        let names: Vec<_> = written.iter().map(|v| v[1].clone()).collect();
        assert_eq!(
            names,
            vec![
                SqlValue::from("Checking"),
                SqlValue::from("Savings"),
                SqlValue::from("Brokerage"),
            ]
        );
        let keys: Vec<_> = written.iter().map(|v| key_of(v)).collect();
        assert_eq!(ids, keys);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_insert_each_stops_at_first_failure() {
        let entities = rows(&["Checking", "Savings", "Brokerage", "Roth IRA"]);
        let mut attempts = 0;

        let result = insert_each(&entities, |values| {
            attempts += 1;
            let outcome = if attempts == 2 {
                Err(PostgresError::Database(sqlx::Error::RowNotFound))
            } else {
                Ok(key_of(&values))
            };
            std::future::ready(outcome)
        })
        .await;

        assert!(matches!(result, Err(PostgresError::Database(_))));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn test_insert_each_empty_batch() {
        let entities: Vec<Row> = Vec::new();
        let ids = insert_each(&entities, |values| std::future::ready(Ok(key_of(&values))))
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
