use super::currency_converter::ExchangeRateTable;
use super::fx_traits::{CurrencyConverterTrait, ExchangeRateStoreTrait};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Currency converter backed by stored exchange rates.
///
/// Each conversion loads the rates touching either currency of the pair, so a
/// two-hop path through a shared pivot currency (usually USD) is always
/// reachable.
#[derive(Clone)]
pub struct ExchangeRateConverter {
    rate_store: Arc<dyn ExchangeRateStoreTrait>,
}

impl ExchangeRateConverter {
    pub fn new(rate_store: Arc<dyn ExchangeRateStoreTrait>) -> Self {
        Self { rate_store }
    }

    /// Loads the rate table for one user and currency pair.
    pub async fn load_table(
        &self,
        user_id: &str,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<ExchangeRateTable> {
        let currencies = vec![from_currency.to_string(), to_currency.to_string()];
        let rates = self
            .rate_store
            .list_exchange_rates(user_id, &currencies)
            .await?;
        debug!(
            "Loaded {} exchange rates for {}/{} (user {})",
            rates.len(),
            from_currency,
            to_currency,
            user_id
        );
        Ok(ExchangeRateTable::from_rates(rates))
    }
}

#[async_trait]
impl CurrencyConverterTrait for ExchangeRateConverter {
    async fn convert(
        &self,
        user_id: &str,
        amount: Decimal,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal> {
        if from_currency == to_currency {
            return Ok(amount);
        }

        let table = self.load_table(user_id, from_currency, to_currency).await?;
        Ok(table.convert_amount(amount, from_currency, to_currency, date)?)
    }
}
