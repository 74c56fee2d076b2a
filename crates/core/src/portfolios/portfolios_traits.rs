//! Portfolio directory and base currency lookup traits.
//!
//! These traits define what the engine needs from the surrounding system
//! without any database-specific types.

use async_trait::async_trait;

use super::portfolios_model::Portfolio;
use crate::errors::Result;

/// Read access to the user's portfolios.
#[async_trait]
pub trait PortfolioDirectoryTrait: Send + Sync {
    /// Finds a portfolio owned by `user_id`.
    ///
    /// Returns `None` when the portfolio does not exist or belongs to another
    /// user; callers map that to `Error::NotFound`.
    async fn find_portfolio(&self, user_id: &str, portfolio_id: &str)
        -> Result<Option<Portfolio>>;

    /// Lists the user's portfolios that are enabled for reporting.
    async fn list_enabled_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>>;
}

/// Resolves the currency every total is expressed in.
#[async_trait]
pub trait BaseCurrencyLookupTrait: Send + Sync {
    /// The user's base currency code, or `None` if not configured.
    async fn get_base_currency(&self, user_id: &str) -> Result<Option<String>>;
}
