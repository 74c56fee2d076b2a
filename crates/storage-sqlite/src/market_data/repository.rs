use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use retrofolio_core::quotes::{PricePoint, PriceStoreTrait};
use retrofolio_core::{Error, Result};

use super::model::SecurityPriceDB;
use crate::db::{run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::security_pricing;
use crate::utils::{chunk_for_sqlite, format_date, rows_per_insert};

#[derive(Clone)]
pub struct SecurityPricingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SecurityPricingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Inserts prices, replacing any existing close for the same security
    /// and day.
    pub async fn upsert_prices(&self, prices: &[PricePoint]) -> Result<usize> {
        let rows: Vec<SecurityPriceDB> = prices.iter().map(SecurityPriceDB::from).collect();
        if rows.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn| {
                let mut written = 0;
                for chunk in rows.chunks(rows_per_insert(3)) {
                    written += diesel::replace_into(security_pricing::table)
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
impl PriceStoreTrait for SecurityPricingRepository {
    async fn list_prices(
        &self,
        security_ids: &[String],
        max_date: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if security_ids.is_empty() {
            return Ok(Vec::new());
        }

        let security_ids = security_ids.to_vec();
        let max_date = format_date(max_date);
        run_blocking(&self.pool, move |conn| {
            let mut rows: Vec<SecurityPriceDB> = Vec::new();
            for chunk in chunk_for_sqlite(&security_ids) {
                let mut loaded = security_pricing::table
                    .filter(security_pricing::security_id.eq_any(chunk))
                    .filter(security_pricing::date.le(&max_date))
                    .select(SecurityPriceDB::as_select())
                    .load::<SecurityPriceDB>(conn)
                    .into_core()?;
                rows.append(&mut loaded);
            }

            debug!(
                "Loaded {} prices for {} securities up to {}",
                rows.len(),
                security_ids.len(),
                max_date
            );

            rows.into_iter()
                .map(|row| PricePoint::try_from(row).map_err(Error::from))
                .collect()
        })
        .await
    }
}
