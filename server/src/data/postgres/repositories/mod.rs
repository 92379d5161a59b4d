//! Per-entity repositories for PostgreSQL
//!
//! Each module owns the fixed SQL for its entities and the filter names its
//! list queries accept. Get-by-id is a list query with the entity's own id
//! filter; an empty result becomes [`PostgresError::NotFound`].

pub mod account;
pub mod contribution;
pub mod expense;
pub mod fund;
pub mod holding;
pub mod portfolio;
mod rows;

use sqlx::PgPool;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::data::postgres::PostgresError;
use crate::data::postgres::query::{
    BindValues, FilterPredicates, FilterValues, get_query_and_values,
};

type Decoder<T> = fn(&PgRow) -> Result<T, sqlx::Error>;

/// Run a filtered SELECT and decode every row
async fn fetch_filtered<T>(
    pool: &PgPool,
    base: &str,
    filters: FilterValues,
    predicates: &FilterPredicates<'_>,
    decode: Decoder<T>,
) -> Result<Vec<T>, PostgresError> {
    let filter_count = filters.len();
    let (sql, args) = get_query_and_values(base, filters, predicates)?;

    let rows = sqlx::query(&sql).bind_values(args).fetch_all(pool).await?;
    tracing::trace!(filter_count, rows = rows.len(), "Filtered select");

    Ok(rows.iter().map(decode).collect::<Result<Vec<_>, _>>()?)
}

/// Run a filtered SELECT restricted to one id via the `id_filter` filter
async fn fetch_by_id<T>(
    pool: &PgPool,
    base: &str,
    predicates: &FilterPredicates<'_>,
    decode: Decoder<T>,
    id_filter: &str,
    entity: &'static str,
    id: Uuid,
) -> Result<T, PostgresError> {
    let filters = FilterValues::new().with(id_filter, id);
    fetch_filtered(pool, base, filters, predicates, decode)
        .await?
        .into_iter()
        .next()
        .ok_or(PostgresError::NotFound { entity, id })
}
