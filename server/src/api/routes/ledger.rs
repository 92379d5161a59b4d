//! Contribution, expense and expense category endpoints

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::resource::{ListFilters, crud_resource};
use crate::api::types::{ApiError, parse_name_list};
use crate::data::postgres::query::FilterValues;
use crate::data::postgres::repositories::{contribution, expense};
use crate::data::types::{
    Contribution, Expense, ExpenseCategory, NewContribution, NewExpense, NewExpenseCategory,
};

/// Insert inclusive `start`/`end` date bounds, rejecting inverted ranges
fn insert_date_range(
    values: &mut FilterValues,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(ApiError::bad_request(
            "INVALID_DATE_RANGE",
            format!("start ({}) is after end ({})", start, end),
        ));
    }
    if let Some(start) = start {
        values.insert("start", start);
    }
    if let Some(end) = end {
        values.insert("end", end);
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContributionFilters {
    pub contribution: Option<Uuid>,
    /// Comma-separated account names
    pub accounts: Option<String>,
    /// Earliest date made, `YYYY-MM-DD`
    pub start: Option<NaiveDate>,
    /// Latest date made, `YYYY-MM-DD`
    pub end: Option<NaiveDate>,
}

impl ListFilters for ContributionFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.contribution {
            values.insert("contribution", id);
        }
        if let Some(accounts) = self.accounts {
            values.insert("accounts", parse_name_list("accounts", &accounts)?);
        }
        insert_date_range(&mut values, self.start, self.end)?;
        Ok(values)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseCategoryFilters {
    pub expense_category: Option<Uuid>,
}

impl ListFilters for ExpenseCategoryFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.expense_category {
            values.insert("expense_category", id);
        }
        Ok(values)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseFilters {
    pub expense: Option<Uuid>,
    /// Comma-separated expense category names
    pub categories: Option<String>,
    /// Earliest date incurred, `YYYY-MM-DD`
    pub start: Option<NaiveDate>,
    /// Latest date incurred, `YYYY-MM-DD`
    pub end: Option<NaiveDate>,
}

impl ListFilters for ExpenseFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.expense {
            values.insert("expense", id);
        }
        if let Some(categories) = self.categories {
            values.insert("categories", parse_name_list("categories", &categories)?);
        }
        insert_date_range(&mut values, self.start, self.end)?;
        Ok(values)
    }
}

crud_resource!(
    Contributions, "contribution",
    entity = Contribution, new = NewContribution, filters = ContributionFilters,
    list = contribution::list_contributions, get = contribution::get_contribution,
    create = contribution::create_contributions, update = contribution::update_contribution,
    delete = contribution::delete_contribution,
);

crud_resource!(
    ExpenseCategories, "expense_category",
    entity = ExpenseCategory, new = NewExpenseCategory, filters = ExpenseCategoryFilters,
    list = expense::list_expense_categories, get = expense::get_expense_category,
    create = expense::create_expense_categories, update = expense::update_expense_category,
    delete = expense::delete_expense_category,
);

crud_resource!(
    Expenses, "expense",
    entity = Expense, new = NewExpense, filters = ExpenseFilters,
    list = expense::list_expenses, get = expense::get_expense,
    create = expense::create_expenses, update = expense::update_expense,
    delete = expense::delete_expense,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::parse_query;
    use crate::data::postgres::query::SqlValue;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_expense_filters_date_range() {
        let filters: ExpenseFilters =
            parse_query("categories=Food,Rent&start=2024-01-01&end=2024-01-31");
        let values = filters.into_filter_values().unwrap();

        let collected: Vec<_> = values.iter().collect();
        assert_eq!(
            collected,
            vec![
                (
                    "categories",
                    &SqlValue::TextList(vec!["Food".to_string(), "Rent".to_string()])
                ),
                ("end", &SqlValue::Date(date("2024-01-31"))),
                ("start", &SqlValue::Date(date("2024-01-01"))),
            ]
        );
    }

    #[test]
    fn test_contribution_filters_open_ended_range() {
        let filters: ContributionFilters = parse_query("accounts=Roth%20IRA&start=2023-06-01");
        let values = filters.into_filter_values().unwrap();

        assert_eq!(values.len(), 2);
        let collected: Vec<_> = values.iter().collect();
        assert_eq!(
            collected[0],
            ("accounts", &SqlValue::TextList(vec!["Roth IRA".to_string()]))
        );
        assert_eq!(collected[1], ("start", &SqlValue::Date(date("2023-06-01"))));
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let filters = ContributionFilters {
            start: Some(date("2024-02-01")),
            end: Some(date("2024-01-01")),
            ..Default::default()
        };
        let err = filters.into_filter_values().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref code, .. } if code == "INVALID_DATE_RANGE"));
    }

    #[test]
    fn test_same_day_range_allowed() {
        let filters = ExpenseFilters {
            start: Some(date("2024-03-15")),
            end: Some(date("2024-03-15")),
            ..Default::default()
        };
        assert_eq!(filters.into_filter_values().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_date_rejected_at_parse() {
        let uri: axum::http::Uri = "/?start=03/15/2024".parse().unwrap();
        assert!(axum::extract::Query::<ExpenseFilters>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn test_blank_category_list_rejected() {
        let filters: ExpenseFilters = parse_query("categories=");
        let err = filters.into_filter_values().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref code, .. } if code == "EMPTY_FILTER"));
    }

    #[test]
    fn test_blank_account_list_rejected() {
        let filters: ContributionFilters = parse_query("accounts=&start=2024-01-01");
        let err = filters.into_filter_values().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref code, .. } if code == "EMPTY_FILTER"));
    }
}
