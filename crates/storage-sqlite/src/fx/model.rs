//! Database models for exchange rates.

use diesel::prelude::*;
use retrofolio_core::fx::{ExchangeRate, RateSource};

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal};

/// Market rate shared by every user.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub base_code: String,
    pub quote_code: String,
    pub date: String,
    pub rate: String,
}

/// Rate entered by a user; overrides the market rate for that user only.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserExchangeRateDB {
    pub user_id: String,
    pub base_code: String,
    pub quote_code: String,
    pub date: String,
    pub rate: String,
}

impl From<&ExchangeRate> for ExchangeRateDB {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            base_code: rate.from_currency.clone(),
            quote_code: rate.to_currency.clone(),
            date: format_date(rate.date),
            rate: rate.rate.to_string(),
        }
    }
}

impl UserExchangeRateDB {
    pub fn from_rate(user_id: &str, rate: &ExchangeRate) -> Self {
        Self {
            user_id: user_id.to_string(),
            base_code: rate.from_currency.clone(),
            quote_code: rate.to_currency.clone(),
            date: format_date(rate.date),
            rate: rate.rate.to_string(),
        }
    }
}

fn decode(
    base_code: String,
    quote_code: String,
    date: &str,
    rate: &str,
    source: RateSource,
) -> Result<ExchangeRate, StorageError> {
    Ok(ExchangeRate::new(
        base_code,
        quote_code,
        parse_date("date", date)?,
        parse_decimal("rate", rate)?,
        source,
    ))
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Self::Error> {
        decode(db.base_code, db.quote_code, &db.date, &db.rate, RateSource::System)
    }
}

impl TryFrom<UserExchangeRateDB> for ExchangeRate {
    type Error = StorageError;

    fn try_from(db: UserExchangeRateDB) -> Result<Self, Self::Error> {
        decode(db.base_code, db.quote_code, &db.date, &db.rate, RateSource::User)
    }
}
