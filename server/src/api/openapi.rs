//! OpenAPI specification and Swagger UI
//!
//! Resource endpoints are generic over their entity type, so the document
//! describes their schemas; the CRUD layout itself is documented in
//! [`crate::api::routes::resource`].

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::health;
use crate::api::types::CreatedIds;
use crate::data::types::{
    Account, AccountCategory, AssetCategory, Contribution, EntityRef, Expense, ExpenseCategory,
    Fund, Holding, NewAccount, NewAccountCategory, NewAssetCategory, NewContribution, NewExpense,
    NewExpenseCategory, NewFund, NewHolding, NewPortfolio, NewPortfolioAssetCategoryMapping,
    NewPortfolioHoldingMapping, Portfolio, PortfolioAssetCategoryMapping, PortfolioHoldingMapping,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finance Tracker API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Accounts, holdings, portfolios, contributions and expenses"
    ),
    tags(
        (name = "health", description = "Health check endpoint")
    ),
    paths(health::health),
    components(schemas(
        // Health
        health::HealthResponse,
        health::PoolHealth,
        // Shared
        EntityRef,
        CreatedIds,
        // Accounts
        AccountCategory,
        Account,
        NewAccountCategory,
        NewAccount,
        // Funds
        AssetCategory,
        Fund,
        Holding,
        NewAssetCategory,
        NewFund,
        NewHolding,
        // Portfolios
        Portfolio,
        PortfolioHoldingMapping,
        PortfolioAssetCategoryMapping,
        NewPortfolio,
        NewPortfolioHoldingMapping,
        NewPortfolioAssetCategoryMapping,
        // Ledger
        Contribution,
        ExpenseCategory,
        Expense,
        NewContribution,
        NewExpenseCategory,
        NewExpense,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Finance Tracker API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
