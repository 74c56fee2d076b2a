use crate::activities::TransactionStoreTrait;
use crate::config::ValuationConfig;
use crate::errors::{Error, Result};
use crate::fx::CurrencyConverterTrait;
use crate::portfolio::holdings::HoldingsReplayer;
use crate::portfolio::valuation::valuation_cache::ValuationCache;
use crate::portfolio::valuation::valuation_calculator::{price_for, ValuationTotals};
use crate::portfolio::valuation::{PortfolioValueAtDate, ValuationServiceTrait};
use crate::portfolios::{BaseCurrencyLookupTrait, PortfolioDirectoryTrait};
use crate::quotes::{PriceResolver, PriceStoreTrait};
use crate::utils::time_utils::unique_sorted_dates;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ValuationService {
    portfolio_directory: Arc<dyn PortfolioDirectoryTrait>,
    base_currency_lookup: Arc<dyn BaseCurrencyLookupTrait>,
    holdings_replayer: HoldingsReplayer,
    price_resolver: PriceResolver,
    currency_converter: Arc<dyn CurrencyConverterTrait>,
    cache: Arc<ValuationCache>,
    config: ValuationConfig,
}

impl ValuationService {
    pub fn new(
        portfolio_directory: Arc<dyn PortfolioDirectoryTrait>,
        base_currency_lookup: Arc<dyn BaseCurrencyLookupTrait>,
        transaction_store: Arc<dyn TransactionStoreTrait>,
        price_store: Arc<dyn PriceStoreTrait>,
        currency_converter: Arc<dyn CurrencyConverterTrait>,
        cache: Arc<ValuationCache>,
        config: ValuationConfig,
    ) -> Self {
        Self {
            portfolio_directory,
            base_currency_lookup,
            holdings_replayer: HoldingsReplayer::new(transaction_store),
            price_resolver: PriceResolver::new(price_store),
            currency_converter,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ValuationCache> {
        &self.cache
    }

    /// Single-date valuation without cache involvement.
    async fn compute_valuation(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate> {
        self.portfolio_directory
            .find_portfolio(user_id, portfolio_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Portfolio {} not found for user {}",
                    portfolio_id, user_id
                ))
            })?;

        let base_currency = self
            .base_currency_lookup
            .get_base_currency(user_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Base currency not set for user {}", user_id))
            })?;

        let holdings = self
            .holdings_replayer
            .compute_holdings(portfolio_id, date)
            .await?;
        if holdings.is_empty() {
            return Ok(PortfolioValueAtDate::zero(date, base_currency));
        }

        let security_ids: Vec<String> = holdings.iter().map(|h| h.security_id.clone()).collect();
        let prices = self
            .price_resolver
            .resolve_prices(&security_ids, &[date])
            .await?;

        let mut totals = ValuationTotals::default();
        for holding in &holdings {
            let Some(price) = price_for(&prices, holding, date) else {
                debug!(
                    "No price for {} on or before {}; valuing at cost basis {}",
                    holding.security_id, date, holding.cost_basis
                );
                totals.add_unpriced(holding);
                continue;
            };

            let market_value = holding.quantity * price;
            let market_value_base = if holding.currency == base_currency {
                market_value
            } else {
                self.currency_converter
                    .convert(
                        user_id,
                        market_value,
                        date,
                        &holding.currency,
                        &base_currency,
                    )
                    .await?
            };
            totals.add_priced(holding, market_value_base);
        }

        Ok(totals.into_value(date, &base_currency))
    }

    /// Computes under the configured deadline and caches successes.
    async fn compute_and_cache(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate> {
        let work = self.compute_valuation(user_id, portfolio_id, date);
        let valuation = match self.config.valuation_timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
                Error::Timeout(format!(
                    "valuation of portfolio {} on {} exceeded {:?}",
                    portfolio_id, date, limit
                ))
            })??,
            None => work.await?,
        };

        self.cache.insert(user_id, portfolio_id, valuation.clone());
        Ok(valuation)
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn valuate(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate> {
        self.compute_valuation(user_id, portfolio_id, date).await
    }

    async fn get_portfolio_value_at_date(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Result<PortfolioValueAtDate> {
        if let Some(cached) = self.cache.get(user_id, portfolio_id, date) {
            return Ok(cached);
        }
        self.compute_and_cache(user_id, portfolio_id, date).await
    }

    async fn valuate_range(
        &self,
        user_id: &str,
        portfolio_id: &str,
        dates: &[NaiveDate],
    ) -> Result<Vec<PortfolioValueAtDate>> {
        let start_time = Instant::now();
        let dates = unique_sorted_dates(dates);

        let mut results = Vec::with_capacity(dates.len());
        let mut misses = Vec::new();
        for date in dates {
            match self.cache.get(user_id, portfolio_id, date) {
                Some(hit) => results.push(hit),
                None => misses.push(date),
            }
        }
        let hits = results.len();

        let computed: Vec<PortfolioValueAtDate> = stream::iter(misses)
            .map(|date| self.compute_and_cache(user_id, portfolio_id, date))
            .buffer_unordered(self.config.max_concurrent_valuations.max(1))
            .try_collect()
            .await
            .inspect_err(|e| {
                warn!(
                    "Range valuation of portfolio {} failed: {}",
                    portfolio_id, e
                )
            })?;

        debug!(
            "Valued portfolio {} on {} dates ({} cached, {} computed) in {:?}",
            portfolio_id,
            hits + computed.len(),
            hits,
            computed.len(),
            start_time.elapsed()
        );

        results.extend(computed);
        results.sort_by_key(|v| v.date);
        Ok(results)
    }

    fn invalidate_portfolio(&self, portfolio_id: &str) {
        self.cache.invalidate_portfolio(portfolio_id);
    }
}
