use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value of one portfolio at the end of one day, in the user's base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValueAtDate {
    pub date: NaiveDate,
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    /// Always `total_value - total_cost_basis`.
    pub unrealized_gain: Decimal,
    pub currency: String,
}

impl PortfolioValueAtDate {
    pub fn new(
        date: NaiveDate,
        total_value: Decimal,
        total_cost_basis: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            date,
            total_value,
            total_cost_basis,
            unrealized_gain: total_value - total_cost_basis,
            currency: currency.into(),
        }
    }

    /// Valuation of a portfolio that holds nothing on `date`.
    pub fn zero(date: NaiveDate, currency: impl Into<String>) -> Self {
        Self::new(date, Decimal::ZERO, Decimal::ZERO, currency)
    }
}

/// Cache entry: a valuation plus the instant it was computed.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValuation {
    pub valuation: PortfolioValueAtDate,
    pub computed_at: DateTime<Utc>,
}
