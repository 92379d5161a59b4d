//! API route handlers

pub mod accounts;
pub mod funds;
pub mod health;
pub mod holdings;
pub mod ledger;
pub mod portfolios;
pub mod resource;

use std::sync::Arc;

use axum::Router;

use crate::data::PostgresService;
use resource::ResourceApiState;

/// Build the CRUD routes for every resource
pub fn resource_routes(database: Arc<PostgresService>) -> Router<()> {
    let state = ResourceApiState { database };

    Router::new()
        .nest(
            "/account-categories",
            resource::routes::<accounts::AccountCategories>(),
        )
        .nest("/accounts", resource::routes::<accounts::Accounts>())
        .nest(
            "/asset-categories",
            resource::routes::<funds::AssetCategories>(),
        )
        .nest("/funds", resource::routes::<funds::Funds>())
        .nest("/holdings", resource::routes::<holdings::Holdings>())
        .nest("/portfolios", resource::routes::<portfolios::Portfolios>())
        .nest(
            "/portfolio-holding-mappings",
            resource::routes::<portfolios::PortfolioHoldingMappings>(),
        )
        .nest(
            "/portfolio-asset-category-mappings",
            resource::routes::<portfolios::PortfolioAssetCategoryMappings>(),
        )
        .nest("/contributions", resource::routes::<ledger::Contributions>())
        .nest(
            "/expense-categories",
            resource::routes::<ledger::ExpenseCategories>(),
        )
        .nest("/expenses", resource::routes::<ledger::Expenses>())
        .with_state(state)
}

/// Deserialize a query string the way the list endpoints do
#[cfg(test)]
pub(crate) fn parse_query<T: serde::de::DeserializeOwned>(query: &str) -> T {
    let uri: axum::http::Uri = format!("/?{}", query).parse().unwrap();
    axum::extract::Query::<T>::try_from_uri(&uri).unwrap().0
}
