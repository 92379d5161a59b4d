//! Data storage layer
//!
//! - `postgres` - Connection pool, query construction and per-entity repositories
//! - `types` - Domain entities and their create/update inputs

pub mod postgres;
pub mod types;

pub use postgres::{PostgresError, PostgresService};
