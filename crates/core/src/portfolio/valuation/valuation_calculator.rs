use crate::constants::DECIMAL_PRECISION;
use crate::portfolio::holdings::Holding;
use crate::portfolio::valuation::PortfolioValueAtDate;
use crate::quotes::PriceKey;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Running totals for one portfolio valuation, in base currency.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValuationTotals {
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
}

impl ValuationTotals {
    /// Adds a holding whose market value is known (already in base currency).
    pub fn add_priced(&mut self, holding: &Holding, market_value_base: Decimal) {
        self.total_value += market_value_base;
        self.total_cost_basis += holding.cost_basis;
    }

    /// Adds a holding with no usable price. Its cost basis stands in for the
    /// market value, so it contributes no gain or loss.
    pub fn add_unpriced(&mut self, holding: &Holding) {
        self.total_value += holding.cost_basis;
        self.total_cost_basis += holding.cost_basis;
    }

    pub fn into_value(self, date: NaiveDate, base_currency: &str) -> PortfolioValueAtDate {
        PortfolioValueAtDate::new(
            date,
            self.total_value.round_dp(DECIMAL_PRECISION),
            self.total_cost_basis.round_dp(DECIMAL_PRECISION),
            base_currency,
        )
    }
}

/// Resolved price of a holding on `date`. A zero price counts as missing.
pub fn price_for(
    prices: &HashMap<PriceKey, Decimal>,
    holding: &Holding,
    date: NaiveDate,
) -> Option<Decimal> {
    prices
        .get(&(holding.security_id.clone(), date))
        .copied()
        .filter(|price| !price.is_zero())
}
