//! Net worth service traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::net_worth_model::{AccountBalancePoint, CombinedBalanceHistoryItem};
use crate::errors::Result;

/// Daily cash account balances, owned outside the valuation engine.
#[async_trait]
pub trait AccountBalanceHistoryTrait: Send + Sync {
    /// Aggregated account balance per day in `[from, to]`. Days without data
    /// may be absent.
    async fn get_balance_history(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountBalancePoint>>;
}

/// Trait defining the contract for cross-portfolio operations.
#[async_trait]
pub trait NetWorthServiceTrait: Send + Sync {
    /// Sum of `total_value` across the user's enabled portfolios per date.
    ///
    /// A portfolio that fails to value is logged and counted as zero so that
    /// one broken ledger cannot hide the others.
    ///
    /// # Returns
    /// A map keyed by date; empty when the user has no enabled portfolio.
    async fn aggregate_portfolio_values(
        &self,
        user_id: &str,
        dates: &[NaiveDate],
    ) -> Result<BTreeMap<NaiveDate, Decimal>>;

    /// Daily account and portfolio balances for `[from, to]`.
    ///
    /// # Arguments
    /// * `from` - First day; defaults to the earliest investment transaction
    ///   of an enabled portfolio, or `to` when there is none
    /// * `to` - Last day; defaults to today
    ///
    /// # Returns
    /// One item per calendar day in ascending order, or an empty vector when
    /// neither accounts nor portfolios have any data.
    async fn get_combined_balance_history(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CombinedBalanceHistoryItem>>;
}
