use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use retrofolio_core::portfolio::net_worth::{AccountBalanceHistoryTrait, AccountBalancePoint};
use retrofolio_core::utils::time_utils::get_days_between;
use retrofolio_core::{Error, Result};

use super::model::BalanceDB;
use crate::db::{run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::balances;
use crate::utils::{format_date, parse_date, parse_decimal, rows_per_insert};

#[derive(Clone)]
pub struct BalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    pub async fn upsert_balances(&self, rows: Vec<BalanceDB>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn| {
                let mut written = 0;
                for chunk in rows.chunks(rows_per_insert(4)) {
                    written += diesel::replace_into(balances::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(written)
            })
            .await
    }
}

/// Sums account balances per day over `[from, to]`.
///
/// Accounts only record days on which their balance changed, so each
/// account's latest balance on or before a day carries forward. Days before
/// any account has a balance are omitted.
fn daily_totals(
    rows: Vec<(String, NaiveDate, Decimal)>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<AccountBalancePoint> {
    let mut latest: HashMap<String, Decimal> = HashMap::new();
    let mut rows = rows.into_iter().peekable();
    let mut points = Vec::new();

    for day in get_days_between(from, to) {
        while let Some((account_id, _, amount)) = rows.next_if(|(_, date, _)| *date <= day) {
            latest.insert(account_id, amount);
        }
        if !latest.is_empty() {
            points.push(AccountBalancePoint {
                date: day,
                amount: latest.values().copied().sum(),
            });
        }
    }
    points
}

#[async_trait]
impl AccountBalanceHistoryTrait for BalanceRepository {
    async fn get_balance_history(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountBalancePoint>> {
        if from > to {
            return Ok(Vec::new());
        }

        let user_id = user_id.to_string();
        let max_date = format_date(to);
        let rows = run_blocking(&self.pool, move |conn| {
            let rows = balances::table
                .filter(balances::user_id.eq(&user_id))
                .filter(balances::date.le(&max_date))
                .order((balances::date.asc(), balances::account_id.asc()))
                .select(BalanceDB::as_select())
                .load::<BalanceDB>(conn)
                .into_core()?;
            debug!("Loaded {} balance rows for user {}", rows.len(), user_id);

            rows.into_iter()
                .map(|row| {
                    let date = parse_date("date", &row.date).map_err(Error::from)?;
                    let amount = parse_decimal("amount", &row.amount).map_err(Error::from)?;
                    Ok((row.account_id, date, amount))
                })
                .collect::<Result<Vec<_>>>()
        })
        .await?;

        Ok(daily_totals(rows, from, to))
    }
}
