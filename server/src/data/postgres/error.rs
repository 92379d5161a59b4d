//! PostgreSQL error types

use thiserror::Error;
use uuid::Uuid;

use super::query::QueryBuildError;

/// SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query error: {0}")]
    Query(#[from] QueryBuildError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PostgresError {
    /// True when the statement was rejected by a foreign key or unique constraint
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => matches!(
                db.code().as_deref(),
                Some(FOREIGN_KEY_VIOLATION) | Some(UNIQUE_VIOLATION)
            ),
            _ => false,
        }
    }
}
