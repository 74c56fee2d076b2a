use super::fx_model::ExchangeRate;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Converts amounts between currencies at a historical date.
#[async_trait]
pub trait CurrencyConverterTrait: Send + Sync {
    /// Converts `amount` from `from_currency` to `to_currency` using the rate
    /// in effect on `date`. `user_id` selects user-defined rate overrides.
    async fn convert(
        &self,
        user_id: &str,
        amount: Decimal,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal>;
}

/// Read access to persisted exchange rates.
#[async_trait]
pub trait ExchangeRateStoreTrait: Send + Sync {
    /// Lists system rates plus the user's own rates whose `from_currency` or
    /// `to_currency` is one of `currencies`.
    async fn list_exchange_rates(
        &self,
        user_id: &str,
        currencies: &[String],
    ) -> Result<Vec<ExchangeRate>>;
}
