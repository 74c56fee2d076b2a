use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use retrofolio_core::portfolios::{BaseCurrencyLookupTrait, Portfolio, PortfolioDirectoryTrait};
use retrofolio_core::Result;

use super::model::{PortfolioDB, UserCurrencyDB};
use crate::db::{run_blocking, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{portfolios, users_currencies};

/// Portfolio directory and base currency lookup backed by SQLite.
#[derive(Clone)]
pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Inserts a portfolio, or updates the owner, name and enabled flag of an
    /// existing one. The row is updated in place so its transactions and
    /// `created_at` are kept.
    pub async fn upsert_portfolio(&self, portfolio: &Portfolio) -> Result<()> {
        let row = PortfolioDB::from(portfolio);
        self.writer
            .exec(move |conn| {
                diesel::insert_into(portfolios::table)
                    .values(&row)
                    .on_conflict(portfolios::id)
                    .do_update()
                    .set((
                        portfolios::user_id.eq(&row.user_id),
                        portfolios::name.eq(&row.name),
                        portfolios::is_enabled.eq(row.is_enabled),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    /// Makes `currency_code` the user's default currency, demoting any
    /// previous default in the same transaction.
    pub async fn set_base_currency(&self, user_id: &str, currency_code: &str) -> Result<()> {
        let row = UserCurrencyDB {
            user_id: user_id.to_string(),
            currency_code: currency_code.to_uppercase(),
            is_default_currency: true,
        };
        self.writer
            .exec(move |conn| {
                diesel::update(users_currencies::table)
                    .filter(users_currencies::user_id.eq(&row.user_id))
                    .set(users_currencies::is_default_currency.eq(false))
                    .execute(conn)
                    .into_core()?;
                diesel::replace_into(users_currencies::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                debug!(
                    "Base currency of user {} set to {}",
                    row.user_id, row.currency_code
                );
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl PortfolioDirectoryTrait for PortfolioRepository {
    async fn find_portfolio(
        &self,
        user_id: &str,
        portfolio_id: &str,
    ) -> Result<Option<Portfolio>> {
        let user_id = user_id.to_string();
        let portfolio_id = portfolio_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let row = portfolios::table
                .filter(portfolios::id.eq(&portfolio_id))
                .filter(portfolios::user_id.eq(&user_id))
                .select(PortfolioDB::as_select())
                .first::<PortfolioDB>(conn)
                .optional()
                .into_core()?;
            Ok(row.map(Portfolio::from))
        })
        .await
    }

    async fn list_enabled_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        let user_id = user_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let rows = portfolios::table
                .filter(portfolios::user_id.eq(&user_id))
                .filter(portfolios::is_enabled.eq(true))
                .order(portfolios::id.asc())
                .select(PortfolioDB::as_select())
                .load::<PortfolioDB>(conn)
                .into_core()?;
            Ok(rows.into_iter().map(Portfolio::from).collect())
        })
        .await
    }
}

#[async_trait]
impl BaseCurrencyLookupTrait for PortfolioRepository {
    async fn get_base_currency(&self, user_id: &str) -> Result<Option<String>> {
        let user_id = user_id.to_string();
        run_blocking(&self.pool, move |conn| {
            users_currencies::table
                .filter(users_currencies::user_id.eq(&user_id))
                .filter(users_currencies::is_default_currency.eq(true))
                .select(users_currencies::currency_code)
                .first::<String>(conn)
                .optional()
                .into_core()
        })
        .await
    }
}
