//! Combined balance history models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of the combined balance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedBalanceHistoryItem {
    pub date: NaiveDate,
    /// Sum of cash account balances in base currency
    pub accounts_balance: Decimal,
    /// Sum of enabled portfolio valuations in base currency
    pub portfolios_balance: Decimal,
    /// accounts_balance + portfolios_balance
    pub total_balance: Decimal,
}

impl CombinedBalanceHistoryItem {
    pub fn new(date: NaiveDate, accounts_balance: Decimal, portfolios_balance: Decimal) -> Self {
        Self {
            date,
            accounts_balance,
            portfolios_balance,
            total_balance: accounts_balance + portfolios_balance,
        }
    }
}

/// Total balance of a user's cash accounts on one day, in base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalancePoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}
