//! Transaction store trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::activities_model::InvestmentTransaction;
use crate::errors::Result;

/// Read access to the investment transaction ledger.
#[async_trait]
pub trait TransactionStoreTrait: Send + Sync {
    /// Lists a portfolio's transactions dated on or before `max_date`,
    /// ordered by date and then creation time.
    async fn list_investment_transactions(
        &self,
        portfolio_id: &str,
        max_date: NaiveDate,
    ) -> Result<Vec<InvestmentTransaction>>;

    /// Date of the oldest transaction across the given portfolios, if any.
    async fn earliest_transaction_date(&self, portfolio_ids: &[String])
        -> Result<Option<NaiveDate>>;
}
