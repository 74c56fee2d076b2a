//! Database models for account balances.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::utils::format_date;

/// Closing balance of one cash account on one day, in the user's base currency.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceDB {
    pub account_id: String,
    pub user_id: String,
    pub date: String,
    pub amount: String,
}

impl BalanceDB {
    pub fn new(account_id: &str, user_id: &str, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            account_id: account_id.to_string(),
            user_id: user_id.to_string(),
            date: format_date(date),
            amount: amount.to_string(),
        }
    }
}
