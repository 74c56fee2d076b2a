use async_trait::async_trait;
use chrono::NaiveDate;

use super::quotes_model::PricePoint;
use crate::errors::Result;

/// Read access to persisted daily closing prices.
#[async_trait]
pub trait PriceStoreTrait: Send + Sync {
    /// Lists every price point of the given securities dated on or before
    /// `max_date`. Ordering is not guaranteed.
    async fn list_prices(&self, security_ids: &[String], max_date: NaiveDate)
        -> Result<Vec<PricePoint>>;
}
