use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use retrofolio_core::fx::{ExchangeRate, ExchangeRateStoreTrait};
use retrofolio_core::{Error, Result};

use super::model::{ExchangeRateDB, UserExchangeRateDB};
use crate::db::{run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{exchange_rates, user_exchange_rates};
use crate::utils::rows_per_insert;

#[derive(Clone)]
pub struct ExchangeRateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExchangeRateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Stores market rates, replacing the rate for an existing pair and day.
    pub async fn upsert_system_rates(&self, rates: &[ExchangeRate]) -> Result<usize> {
        let rows: Vec<ExchangeRateDB> = rates.iter().map(ExchangeRateDB::from).collect();
        if rows.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn| {
                let mut written = 0;
                for chunk in rows.chunks(rows_per_insert(4)) {
                    written += diesel::replace_into(exchange_rates::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(written)
            })
            .await
    }

    /// Stores rates entered by `user_id`.
    pub async fn upsert_user_rates(&self, user_id: &str, rates: &[ExchangeRate]) -> Result<usize> {
        let rows: Vec<UserExchangeRateDB> = rates
            .iter()
            .map(|rate| UserExchangeRateDB::from_rate(user_id, rate))
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn| {
                let mut written = 0;
                for chunk in rows.chunks(rows_per_insert(5)) {
                    written += diesel::replace_into(user_exchange_rates::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(written)
            })
            .await
    }
}

#[async_trait]
impl ExchangeRateStoreTrait for ExchangeRateRepository {
    /// Loads every system rate plus the user's own rates. With a non-empty
    /// `currencies` list, only pairs touching one of them are returned.
    async fn list_exchange_rates(
        &self,
        user_id: &str,
        currencies: &[String],
    ) -> Result<Vec<ExchangeRate>> {
        let user_id = user_id.to_string();
        let currencies = currencies.to_vec();
        run_blocking(&self.pool, move |conn| {
            let mut system_query = exchange_rates::table
                .select(ExchangeRateDB::as_select())
                .into_boxed();
            let mut user_query = user_exchange_rates::table
                .filter(user_exchange_rates::user_id.eq(&user_id))
                .select(UserExchangeRateDB::as_select())
                .into_boxed();
            if !currencies.is_empty() {
                system_query = system_query.filter(
                    exchange_rates::base_code
                        .eq_any(&currencies)
                        .or(exchange_rates::quote_code.eq_any(&currencies)),
                );
                user_query = user_query.filter(
                    user_exchange_rates::base_code
                        .eq_any(&currencies)
                        .or(user_exchange_rates::quote_code.eq_any(&currencies)),
                );
            }

            let system_rows = system_query.load::<ExchangeRateDB>(conn).into_core()?;
            let user_rows = user_query.load::<UserExchangeRateDB>(conn).into_core()?;
            debug!(
                "Loaded {} system and {} user exchange rates for user {}",
                system_rows.len(),
                user_rows.len(),
                user_id
            );

            let mut rates = Vec::with_capacity(system_rows.len() + user_rows.len());
            for row in system_rows {
                rates.push(ExchangeRate::try_from(row).map_err(Error::from)?);
            }
            for row in user_rows {
                rates.push(ExchangeRate::try_from(row).map_err(Error::from)?);
            }
            Ok(rates)
        })
        .await
    }
}
