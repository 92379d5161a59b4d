//! Account and account category endpoints

use serde::Deserialize;
use uuid::Uuid;

use super::resource::{ListFilters, crud_resource};
use crate::api::types::{ApiError, parse_name_list};
use crate::data::postgres::query::FilterValues;
use crate::data::postgres::repositories::account;
use crate::data::types::{Account, AccountCategory, NewAccount, NewAccountCategory};

/// `GET /account-categories` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountCategoryFilters {
    pub account_category: Option<Uuid>,
}

impl ListFilters for AccountCategoryFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.account_category {
            values.insert("account_category", id);
        }
        Ok(values)
    }
}

/// `GET /accounts` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountFilters {
    pub account: Option<Uuid>,
    /// Comma-separated category names
    pub categories: Option<String>,
}

impl ListFilters for AccountFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.account {
            values.insert("account", id);
        }
        if let Some(categories) = self.categories {
            values.insert("categories", parse_name_list("categories", &categories)?);
        }
        Ok(values)
    }
}

crud_resource!(
    AccountCategories, "account_category",
    entity = AccountCategory, new = NewAccountCategory, filters = AccountCategoryFilters,
    list = account::list_account_categories, get = account::get_account_category,
    create = account::create_account_categories, update = account::update_account_category,
    delete = account::delete_account_category,
);

crud_resource!(
    Accounts, "account",
    entity = Account, new = NewAccount, filters = AccountFilters,
    list = account::list_accounts, get = account::get_account,
    create = account::create_accounts, update = account::update_account,
    delete = account::delete_account,
);
