//! Valuation service contract.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::valuation_model::PortfolioValueAtDate;
use crate::errors::Result;

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Computes the value of a portfolio at the end of `date`, bypassing the
    /// cache.
    ///
    /// Args:
    ///     user_id: Owner of the portfolio; selects the base currency.
    ///     portfolio_id: The portfolio to value.
    ///     date: Any calendar day, past or future.
    ///
    /// Returns:
    ///     The valuation in base currency, or `NotFound` when the portfolio is
    ///     not owned by the user or the user has no base currency.
    async fn valuate(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate>;

    /// Cached variant of [`ValuationServiceTrait::valuate`]. Fresh cache
    /// entries are returned as-is; stale or missing ones are recomputed and
    /// stored. Failures are never cached.
    async fn get_portfolio_value_at_date(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate>;

    /// Values a portfolio on several dates.
    ///
    /// Args:
    ///     dates: Requested days in any order; duplicates are collapsed.
    ///
    /// Returns:
    ///     One valuation per distinct date, ascending. Any failing date fails
    ///     the whole call.
    async fn valuate_range(
        &self,
        user_id: &str,
        portfolio_id: &str,
        dates: &[NaiveDate],
    ) -> Result<Vec<PortfolioValueAtDate>>;

    /// Drops every cached valuation of the portfolio, e.g. after its ledger
    /// changed.
    fn invalidate_portfolio(&self, portfolio_id: &str);
}
