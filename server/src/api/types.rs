//! Shared API types
//!
//! Error responses, batch request bodies and list-parameter parsing used by
//! every resource endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::constants::MAX_CREATE_BATCH;
use crate::data::PostgresError;
use crate::data::postgres::query::QueryBuildError;
use crate::utils::string::parse_string_array;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_postgres(e: PostgresError) -> Self {
        if e.is_constraint_violation() {
            tracing::debug!(error = %e, "Constraint violation");
            return Self::conflict(
                "CONSTRAINT_VIOLATION",
                "Request references a missing entity or duplicates an existing one",
            );
        }

        match e {
            PostgresError::NotFound { .. } => Self::not_found("NOT_FOUND", e.to_string()),
            PostgresError::Query(QueryBuildError::UnmappedFilter(name)) => Self::bad_request(
                "UNMAPPED_FILTER",
                format!("Unsupported filter: {}", name),
            ),
            other => {
                tracing::error!(error = %other, "PostgreSQL error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Validator function for create batches
pub fn validate_batch_size<T>(items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(
            ValidationError::new("items_empty").with_message("Batch cannot be empty".into())
        );
    }
    if items.len() > MAX_CREATE_BATCH {
        return Err(ValidationError::new("items_too_many").with_message(
            format!("Cannot create more than {} items at once", MAX_CREATE_BATCH).into(),
        ));
    }
    Ok(())
}

/// Body of every create endpoint: a JSON array of new entities
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct CreateBatch<T>(pub Vec<T>);

impl<T: Validate> Validate for CreateBatch<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_batch_size(&self.0).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("items", e);
            errors
        })?;
        self.0.iter().try_for_each(Validate::validate)
    }
}

/// Ids assigned to created entities, in request order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedIds {
    pub ids: Vec<Uuid>,
}

/// Split a comma-separated (or JSON array) query value into names.
///
/// A parameter that is present but lists nothing is rejected; binding an
/// empty array would silently match no rows.
pub fn parse_name_list(param: &str, value: &str) -> Result<Vec<String>, ApiError> {
    let names = parse_string_array(value);
    if names.is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_FILTER",
            format!("Filter '{}' must list at least one value", param),
        ));
    }
    Ok(names)
}

/// Split a comma-separated (or JSON array) query value into ids
pub fn parse_uuid_list(param: &str, value: &str) -> Result<Vec<Uuid>, ApiError> {
    parse_name_list(param, value)?
        .iter()
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| {
                ApiError::bad_request(
                    "INVALID_UUID",
                    format!("Invalid id in '{}': {}", param, s),
                )
            })
        })
        .collect()
}
