//! In-memory collaborators shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::activities::{InvestmentTransaction, TransactionCategory, TransactionStoreTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::fx::{CurrencyConverterTrait, FxError};
use crate::portfolios::{BaseCurrencyLookupTrait, Portfolio, PortfolioDirectoryTrait};
use crate::quotes::{PricePoint, PriceStoreTrait};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn portfolio(id: &str, user_id: &str) -> Portfolio {
    Portfolio {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("Portfolio {}", id),
        is_enabled: true,
    }
}

/// Transaction created at noon of its own date, in USD with no fees.
pub fn transaction(
    portfolio_id: &str,
    security_id: &str,
    date: NaiveDate,
    category: TransactionCategory,
    quantity: Decimal,
    ref_amount: Decimal,
) -> InvestmentTransaction {
    InvestmentTransaction {
        id: format!("{}-{}-{}-{}", portfolio_id, security_id, date, category),
        portfolio_id: portfolio_id.to_string(),
        security_id: security_id.to_string(),
        date,
        category,
        quantity,
        ref_amount,
        ref_fees: Decimal::ZERO,
        currency: "USD".to_string(),
        created_at: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
    }
}

pub fn buy(
    portfolio_id: &str,
    security_id: &str,
    date: NaiveDate,
    quantity: Decimal,
    ref_amount: Decimal,
) -> InvestmentTransaction {
    transaction(
        portfolio_id,
        security_id,
        date,
        TransactionCategory::Buy,
        quantity,
        ref_amount,
    )
}

pub fn sell(
    portfolio_id: &str,
    security_id: &str,
    date: NaiveDate,
    quantity: Decimal,
    ref_amount: Decimal,
) -> InvestmentTransaction {
    transaction(
        portfolio_id,
        security_id,
        date,
        TransactionCategory::Sell,
        quantity,
        ref_amount,
    )
}

pub fn price(security_id: &str, date: NaiveDate, close_price: Decimal) -> PricePoint {
    PricePoint {
        security_id: security_id.to_string(),
        date,
        close_price,
    }
}

/// Portfolio directory, base currencies, ledger and prices held in memory.
///
/// Portfolios listed in `failing_portfolios` make transaction fetches fail
/// with a database error.
#[derive(Default)]
pub struct InMemoryLedger {
    pub portfolios: RwLock<Vec<Portfolio>>,
    pub base_currencies: RwLock<HashMap<String, String>>,
    pub transactions: RwLock<Vec<InvestmentTransaction>>,
    pub prices: RwLock<Vec<PricePoint>>,
    pub failing_portfolios: RwLock<HashSet<String>>,
    pub transaction_fetches: AtomicUsize,
    pub price_fetches: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_portfolio(self, portfolio: Portfolio) -> Self {
        self.portfolios.write().unwrap().push(portfolio);
        self
    }

    pub fn with_base_currency(self, user_id: &str, currency: &str) -> Self {
        self.base_currencies
            .write()
            .unwrap()
            .insert(user_id.to_string(), currency.to_string());
        self
    }

    pub fn with_transactions(self, transactions: Vec<InvestmentTransaction>) -> Self {
        self.transactions.write().unwrap().extend(transactions);
        self
    }

    pub fn with_prices(self, prices: Vec<PricePoint>) -> Self {
        self.prices.write().unwrap().extend(prices);
        self
    }

    pub fn fail_portfolio(&self, portfolio_id: &str) {
        self.failing_portfolios
            .write()
            .unwrap()
            .insert(portfolio_id.to_string());
    }

    pub fn heal_portfolio(&self, portfolio_id: &str) {
        self.failing_portfolios.write().unwrap().remove(portfolio_id);
    }

    pub fn transaction_fetches(&self) -> usize {
        self.transaction_fetches.load(Ordering::SeqCst)
    }

    pub fn price_fetches(&self) -> usize {
        self.price_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortfolioDirectoryTrait for InMemoryLedger {
    async fn find_portfolio(&self, user_id: &str, portfolio_id: &str) -> Result<Option<Portfolio>> {
        Ok(self
            .portfolios
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == portfolio_id && p.user_id == user_id)
            .cloned())
    }

    async fn list_enabled_portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        Ok(self
            .portfolios
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id && p.is_enabled)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseCurrencyLookupTrait for InMemoryLedger {
    async fn get_base_currency(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.base_currencies.read().unwrap().get(user_id).cloned())
    }
}

#[async_trait]
impl TransactionStoreTrait for InMemoryLedger {
    async fn list_investment_transactions(
        &self,
        portfolio_id: &str,
        max_date: NaiveDate,
    ) -> Result<Vec<InvestmentTransaction>> {
        self.transaction_fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_portfolios.read().unwrap().contains(portfolio_id) {
            return Err(Error::Database(DatabaseError::QueryFailed(format!(
                "ledger of {} unavailable",
                portfolio_id
            ))));
        }
        Ok(self
            .transactions
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.portfolio_id == portfolio_id && t.date <= max_date)
            .cloned()
            .collect())
    }

    async fn earliest_transaction_date(
        &self,
        portfolio_ids: &[String],
    ) -> Result<Option<NaiveDate>> {
        Ok(self
            .transactions
            .read()
            .unwrap()
            .iter()
            .filter(|t| portfolio_ids.contains(&t.portfolio_id))
            .map(|t| t.date)
            .min())
    }
}

#[async_trait]
impl PriceStoreTrait for InMemoryLedger {
    async fn list_prices(
        &self,
        security_ids: &[String],
        max_date: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        self.price_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .prices
            .read()
            .unwrap()
            .iter()
            .filter(|p| security_ids.contains(&p.security_id) && p.date <= max_date)
            .cloned()
            .collect())
    }
}

/// Converter with one constant rate per ordered currency pair.
#[derive(Default)]
pub struct StaticRateConverter {
    rates: HashMap<(String, String), Decimal>,
    pub conversions: AtomicUsize,
}

impl StaticRateConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }

    pub fn conversions(&self) -> usize {
        self.conversions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CurrencyConverterTrait for StaticRateConverter {
    async fn convert(
        &self,
        _user_id: &str,
        amount: Decimal,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal> {
        self.conversions.fetch_add(1, Ordering::SeqCst);
        self.rates
            .get(&(from_currency.to_string(), to_currency.to_string()))
            .map(|rate| amount * rate)
            .ok_or_else(|| {
                FxError::RateNotFound(format!("{}/{} on {}", from_currency, to_currency, date))
                    .into()
            })
    }
}

/// Transaction store that sleeps before every fetch and records the highest
/// number of fetches in flight at once.
pub struct SlowTransactionStore {
    inner: Arc<InMemoryLedger>,
    delay: StdDuration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowTransactionStore {
    pub fn new(inner: Arc<InMemoryLedger>, delay: StdDuration) -> Self {
        Self {
            inner,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

// Decrements the in-flight count even when the fetch is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TransactionStoreTrait for SlowTransactionStore {
    async fn list_investment_transactions(
        &self,
        portfolio_id: &str,
        max_date: NaiveDate,
    ) -> Result<Vec<InvestmentTransaction>> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.inner
            .list_investment_transactions(portfolio_id, max_date)
            .await
    }

    async fn earliest_transaction_date(
        &self,
        portfolio_ids: &[String],
    ) -> Result<Option<NaiveDate>> {
        self.inner.earliest_transaction_date(portfolio_ids).await
    }
}
