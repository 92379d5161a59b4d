//! Generic CRUD endpoints shared by every resource
//!
//! Each resource is a unit type implementing [`Resource`] by delegating to
//! its repository functions. [`routes`] mounts the five standard endpoints:
//!
//! | Method | Path    | Success                      |
//! |--------|---------|------------------------------|
//! | GET    | `/`     | 200, JSON array              |
//! | POST   | `/`     | 201, `{"ids": [...]}`        |
//! | GET    | `/{id}` | 200, entity                  |
//! | PUT    | `/{id}` | 204                          |
//! | DELETE | `/{id}` | 204                          |

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{FilterQuery, IdPath, ValidatedJson};
use crate::api::types::{ApiError, CreateBatch, CreatedIds};
use crate::data::postgres::query::FilterValues;
use crate::data::{PostgresError, PostgresService};

/// Query parameters accepted by a list endpoint
pub trait ListFilters: DeserializeOwned + Send + 'static {
    /// Translate the parsed parameters into named filter values
    fn into_filter_values(self) -> Result<FilterValues, ApiError>;
}

/// A CRUD resource backed by one repository
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Name used in logs
    const NAME: &'static str;

    type Entity: Serialize + Send + 'static;
    type New: DeserializeOwned + Validate + Send + Sync + 'static;
    type Filters: ListFilters;

    async fn list(
        pool: &PgPool,
        filters: FilterValues,
    ) -> Result<Vec<Self::Entity>, PostgresError>;

    async fn get(pool: &PgPool, id: Uuid) -> Result<Self::Entity, PostgresError>;

    async fn create(pool: &PgPool, items: &[Self::New]) -> Result<Vec<Uuid>, PostgresError>;

    async fn update(pool: &PgPool, id: Uuid, item: &Self::New) -> Result<(), PostgresError>;

    async fn delete(pool: &PgPool, id: Uuid) -> Result<(), PostgresError>;
}

/// Implement [`Resource`] for a unit type by delegating to repository functions
macro_rules! crud_resource {
    (
        $name:ident, $label:literal,
        entity = $entity:ty, new = $new:ty, filters = $filters:ty,
        list = $list:path, get = $get:path, create = $create:path,
        update = $update:path, delete = $delete:path $(,)?
    ) => {
        pub struct $name;

        #[async_trait::async_trait]
        impl $crate::api::routes::resource::Resource for $name {
            const NAME: &'static str = $label;

            type Entity = $entity;
            type New = $new;
            type Filters = $filters;

            async fn list(
                pool: &sqlx::PgPool,
                filters: $crate::data::postgres::query::FilterValues,
            ) -> Result<Vec<$entity>, $crate::data::PostgresError> {
                $list(pool, filters).await
            }

            async fn get(
                pool: &sqlx::PgPool,
                id: uuid::Uuid,
            ) -> Result<$entity, $crate::data::PostgresError> {
                $get(pool, id).await
            }

            async fn create(
                pool: &sqlx::PgPool,
                items: &[$new],
            ) -> Result<Vec<uuid::Uuid>, $crate::data::PostgresError> {
                $create(pool, items).await
            }

            async fn update(
                pool: &sqlx::PgPool,
                id: uuid::Uuid,
                item: &$new,
            ) -> Result<(), $crate::data::PostgresError> {
                $update(pool, id, item).await
            }

            async fn delete(
                pool: &sqlx::PgPool,
                id: uuid::Uuid,
            ) -> Result<(), $crate::data::PostgresError> {
                $delete(pool, id).await
            }
        }
    };
}

pub(crate) use crud_resource;

/// Shared state for resource endpoints
#[derive(Clone)]
pub struct ResourceApiState {
    pub database: Arc<PostgresService>,
}

/// Build the CRUD routes for one resource
pub fn routes<R: Resource>() -> Router<ResourceApiState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
}

pub async fn list<R: Resource>(
    State(state): State<ResourceApiState>,
    FilterQuery(filters): FilterQuery<R::Filters>,
) -> Result<Json<Vec<R::Entity>>, ApiError> {
    let filters = filters.into_filter_values()?;
    tracing::trace!(resource = R::NAME, filters = filters.len(), "List");

    let entities = R::list(state.database.pool(), filters)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(entities))
}

pub async fn create<R: Resource>(
    State(state): State<ResourceApiState>,
    ValidatedJson(CreateBatch(items)): ValidatedJson<CreateBatch<R::New>>,
) -> Result<(StatusCode, Json<CreatedIds>), ApiError> {
    let ids = R::create(state.database.pool(), &items)
        .await
        .map_err(ApiError::from_postgres)?;

    tracing::debug!(resource = R::NAME, count = ids.len(), "Created");
    Ok((StatusCode::CREATED, Json(CreatedIds { ids })))
}

pub async fn get_one<R: Resource>(
    State(state): State<ResourceApiState>,
    IdPath { id }: IdPath,
) -> Result<Json<R::Entity>, ApiError> {
    let entity = R::get(state.database.pool(), id)
        .await
        .map_err(ApiError::from_postgres)?;

    Ok(Json(entity))
}

pub async fn update<R: Resource>(
    State(state): State<ResourceApiState>,
    IdPath { id }: IdPath,
    ValidatedJson(item): ValidatedJson<R::New>,
) -> Result<StatusCode, ApiError> {
    R::update(state.database.pool(), id, &item)
        .await
        .map_err(ApiError::from_postgres)?;

    tracing::debug!(resource = R::NAME, %id, "Updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<R: Resource>(
    State(state): State<ResourceApiState>,
    IdPath { id }: IdPath,
) -> Result<StatusCode, ApiError> {
    R::delete(state.database.pool(), id)
        .await
        .map_err(ApiError::from_postgres)?;

    tracing::debug!(resource = R::NAME, %id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}
