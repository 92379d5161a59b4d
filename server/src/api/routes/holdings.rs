//! Holding endpoints

use serde::Deserialize;
use uuid::Uuid;

use super::resource::{ListFilters, crud_resource};
use crate::api::types::{ApiError, parse_uuid_list};
use crate::data::postgres::query::FilterValues;
use crate::data::postgres::repositories::holding;
use crate::data::types::{Holding, NewHolding};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoldingFilters {
    pub holding: Option<Uuid>,
    /// Comma-separated account ids
    pub accounts: Option<String>,
    /// Comma-separated fund ids
    pub funds: Option<String>,
}

impl ListFilters for HoldingFilters {
    fn into_filter_values(self) -> Result<FilterValues, ApiError> {
        let mut values = FilterValues::new();
        if let Some(id) = self.holding {
            values.insert("holding", id);
        }
        if let Some(accounts) = self.accounts {
            values.insert("accounts", parse_uuid_list("accounts", &accounts)?);
        }
        if let Some(funds) = self.funds {
            values.insert("funds", parse_uuid_list("funds", &funds)?);
        }
        Ok(values)
    }
}

crud_resource!(
    Holdings, "holding",
    entity = Holding, new = NewHolding, filters = HoldingFilters,
    list = holding::list_holdings, get = holding::get_holding,
    create = holding::create_holdings, update = holding::update_holding,
    delete = holding::delete_holding,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::parse_query;
    use crate::data::postgres::query::SqlValue;

    #[test]
    fn test_holding_filters_parse_id_lists() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let filters: HoldingFilters = parse_query(&format!("accounts={},{}", a, b));
        let values = filters.into_filter_values().unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(
            values.iter().next().unwrap(),
            ("accounts", &SqlValue::UuidList(vec![a, b]))
        );
    }

    #[test]
    fn test_holding_filters_reject_bad_fund_id() {
        let filters = HoldingFilters {
            funds: Some("VTSAX".to_string()),
            ..Default::default()
        };
        assert!(filters.into_filter_values().is_err());
    }
}
