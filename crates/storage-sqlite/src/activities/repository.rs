use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::min;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use retrofolio_core::activities::{InvestmentTransaction, TransactionStoreTrait};
use retrofolio_core::{Error, Result};

use super::model::InvestmentTransactionDB;
use crate::db::{run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::investment_transactions;
use crate::utils::{chunk_for_sqlite, format_date, parse_date, rows_per_insert};

#[derive(Clone)]
pub struct InvestmentTransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InvestmentTransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Appends transactions to the ledger in one write transaction.
    ///
    /// The ledger is append-only: an id that already exists fails the whole
    /// batch.
    pub async fn insert_transactions(&self, transactions: &[InvestmentTransaction]) -> Result<usize> {
        let rows: Vec<InvestmentTransactionDB> = transactions
            .iter()
            .map(InvestmentTransactionDB::from)
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn| {
                let mut written = 0;
                for chunk in rows.chunks(rows_per_insert(10)) {
                    written += diesel::insert_into(investment_transactions::table)
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
impl TransactionStoreTrait for InvestmentTransactionRepository {
    async fn list_investment_transactions(
        &self,
        portfolio_id: &str,
        max_date: NaiveDate,
    ) -> Result<Vec<InvestmentTransaction>> {
        let portfolio_id = portfolio_id.to_string();
        let max_date = format_date(max_date);
        run_blocking(&self.pool, move |conn| {
            let rows = investment_transactions::table
                .filter(investment_transactions::portfolio_id.eq(&portfolio_id))
                .filter(investment_transactions::date.le(&max_date))
                .order((
                    investment_transactions::date.asc(),
                    investment_transactions::created_at.asc(),
                ))
                .select(InvestmentTransactionDB::as_select())
                .load::<InvestmentTransactionDB>(conn)
                .into_core()?;

            debug!(
                "Loaded {} transactions for portfolio {} up to {}",
                rows.len(),
                portfolio_id,
                max_date
            );

            rows.into_iter()
                .map(|row| InvestmentTransaction::try_from(row).map_err(Error::from))
                .collect()
        })
        .await
    }

    async fn earliest_transaction_date(
        &self,
        portfolio_ids: &[String],
    ) -> Result<Option<NaiveDate>> {
        if portfolio_ids.is_empty() {
            return Ok(None);
        }

        let portfolio_ids = portfolio_ids.to_vec();
        run_blocking(&self.pool, move |conn| {
            let mut earliest: Option<String> = None;
            for chunk in chunk_for_sqlite(&portfolio_ids) {
                let chunk_min = investment_transactions::table
                    .filter(investment_transactions::portfolio_id.eq_any(chunk))
                    .select(min(investment_transactions::date))
                    .first::<Option<String>>(conn)
                    .into_core()?;
                earliest = match (earliest, chunk_min) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }

            earliest
                .map(|raw| parse_date("date", &raw).map_err(Error::from))
                .transpose()
        })
        .await
    }
}
