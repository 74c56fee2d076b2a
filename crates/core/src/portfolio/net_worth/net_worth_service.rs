//! Cross-portfolio aggregation and combined balance history.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::net_worth_model::CombinedBalanceHistoryItem;
use super::net_worth_traits::{AccountBalanceHistoryTrait, NetWorthServiceTrait};
use crate::activities::TransactionStoreTrait;
use crate::clock::Clock;
use crate::errors::{Error, Result};
use crate::portfolio::valuation::ValuationServiceTrait;
use crate::portfolios::PortfolioDirectoryTrait;
use crate::utils::time_utils::{get_days_between, unique_sorted_dates};

pub struct NetWorthService {
    portfolio_directory: Arc<dyn PortfolioDirectoryTrait>,
    transaction_store: Arc<dyn TransactionStoreTrait>,
    valuation_service: Arc<dyn ValuationServiceTrait>,
    account_balances: Arc<dyn AccountBalanceHistoryTrait>,
    clock: Arc<dyn Clock>,
}

impl NetWorthService {
    pub fn new(
        portfolio_directory: Arc<dyn PortfolioDirectoryTrait>,
        transaction_store: Arc<dyn TransactionStoreTrait>,
        valuation_service: Arc<dyn ValuationServiceTrait>,
        account_balances: Arc<dyn AccountBalanceHistoryTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            portfolio_directory,
            transaction_store,
            valuation_service,
            account_balances,
            clock,
        }
    }

    /// First day of the default history window: the oldest investment
    /// transaction of an enabled portfolio, never later than `to`.
    async fn default_start_date(&self, user_id: &str, to: NaiveDate) -> Result<NaiveDate> {
        let portfolio_ids: Vec<String> = self
            .portfolio_directory
            .list_enabled_portfolios(user_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if portfolio_ids.is_empty() {
            return Ok(to);
        }

        let earliest = self
            .transaction_store
            .earliest_transaction_date(&portfolio_ids)
            .await?;
        Ok(earliest.map_or(to, |date| date.min(to)))
    }

    async fn build_combined_history(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CombinedBalanceHistoryItem>> {
        let to = to.unwrap_or_else(|| self.clock.today());
        let from = match from {
            Some(from) => from,
            None => self.default_start_date(user_id, to).await?,
        };
        if from > to {
            return Err(Error::Validation(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }

        let days = get_days_between(from, to);
        debug!(
            "Building combined balance history for user {} from {} to {} ({} days)",
            user_id,
            from,
            to,
            days.len()
        );

        let (accounts_history, portfolio_values) = tokio::join!(
            self.account_balances.get_balance_history(user_id, from, to),
            self.aggregate_portfolio_values(user_id, &days)
        );
        let accounts_history = accounts_history?;
        let portfolio_values = portfolio_values?;

        if accounts_history.is_empty() && portfolio_values.is_empty() {
            return Ok(Vec::new());
        }

        let accounts_by_date: HashMap<NaiveDate, Decimal> = accounts_history
            .into_iter()
            .map(|point| (point.date, point.amount))
            .collect();

        Ok(days
            .into_iter()
            .map(|date| {
                CombinedBalanceHistoryItem::new(
                    date,
                    accounts_by_date.get(&date).copied().unwrap_or_default(),
                    portfolio_values.get(&date).copied().unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl NetWorthServiceTrait for NetWorthService {
    async fn aggregate_portfolio_values(
        &self,
        user_id: &str,
        dates: &[NaiveDate],
    ) -> Result<BTreeMap<NaiveDate, Decimal>> {
        let portfolios = self
            .portfolio_directory
            .list_enabled_portfolios(user_id)
            .await?;
        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        if portfolios.is_empty() {
            return Ok(totals);
        }

        let dates = unique_sorted_dates(dates);
        let results = join_all(portfolios.iter().map(|portfolio| {
            self.valuation_service
                .valuate_range(user_id, &portfolio.id, &dates)
        }))
        .await;

        for (portfolio, result) in portfolios.iter().zip(results) {
            match result {
                Ok(values) => {
                    for value in values {
                        *totals.entry(value.date).or_default() += value.total_value;
                    }
                }
                Err(e) => {
                    warn!(
                        "Valuation of portfolio {} failed, counting it as zero: {}",
                        portfolio.id, e
                    );
                    for date in &dates {
                        totals.entry(*date).or_default();
                    }
                }
            }
        }

        Ok(totals)
    }

    async fn get_combined_balance_history(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CombinedBalanceHistoryItem>> {
        self.build_combined_history(user_id, from, to)
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to build combined balance history for user {}: {}",
                    user_id, e
                )
            })
    }
}
