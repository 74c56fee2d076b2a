use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{ExchangeRate, RateSource};
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Historical exchange rates organised as a currency graph.
///
/// Rates are stored as independent time series per pair; conversion paths
/// through intermediate currencies are found on demand.
#[derive(Debug, Default)]
pub struct ExchangeRateTable {
    /// Currency -> currencies it has a direct rate to.
    adj: HashMap<String, HashSet<String>>,

    /// Key: (from, to). Value: date -> rate.
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table where user rates override system rates for the same
    /// pair and day. Invalid rates are skipped.
    pub fn from_rates(mut exchange_rates: Vec<ExchangeRate>) -> Self {
        // System first so that user rates inserted later win.
        exchange_rates.sort_by_key(|r| r.source == RateSource::User);

        let mut table = Self::new();
        for rate in &exchange_rates {
            if let Err(e) = table.add_rate(rate) {
                warn!("Skipping exchange rate {} on {}: {}", rate.symbol(), rate.date, e);
            }
        }
        table
    }

    /// Stores a rate and its inverse. A later rate for the same pair and day
    /// replaces the earlier one.
    pub fn add_rate(&mut self, rate: &ExchangeRate) -> Result<(), FxError> {
        if rate.from_currency == rate.to_currency {
            return Ok(());
        }
        if rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{} on {} must be positive, got {}",
                rate.symbol(),
                rate.date,
                rate.rate
            )));
        }

        self.insert_edge(&rate.from_currency, &rate.to_currency, rate.date, rate.rate);
        self.insert_edge(
            &rate.to_currency,
            &rate.from_currency,
            rate.date,
            Decimal::ONE / rate.rate,
        );
        Ok(())
    }

    fn insert_edge(&mut self, from: &str, to: &str, date: NaiveDate, rate: Decimal) {
        self.rates
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .insert(date, rate);
        self.adj
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Direct rate between two connected currencies: the latest rate on or
    /// before `date`, otherwise the earliest later one.
    fn get_direct_rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        let history = self.rates.get(&(from.to_string(), to.to_string()))?;
        history
            .range(..=date)
            .next_back()
            .or_else(|| history.range(date..).next())
            .map(|(_, rate)| *rate)
    }

    /// Converts an amount along the shortest path found by breadth-first
    /// search. Each hop uses the rate in effect on `date`.
    pub fn convert_amount(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        if from_currency == to_currency {
            return Ok(amount);
        }

        // BFS State: (Current Currency, Accumulated Rate)
        let mut queue: VecDeque<(String, Decimal)> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();

        queue.push_back((from_currency.to_string(), Decimal::ONE));
        visited.insert(from_currency.to_string());

        while let Some((current_curr, current_rate)) = queue.pop_front() {
            if current_curr == to_currency {
                return Ok(amount * current_rate);
            }

            let Some(neighbors) = self.adj.get(&current_curr) else {
                continue;
            };
            // Sorted so that equally short paths resolve the same way every time.
            let mut neighbors: Vec<&String> = neighbors.iter().collect();
            neighbors.sort();

            for neighbor in neighbors {
                if visited.contains(neighbor) {
                    continue;
                }
                if let Some(rate) = self.get_direct_rate(&current_curr, neighbor, date) {
                    visited.insert(neighbor.clone());
                    queue.push_back((neighbor.clone(), current_rate * rate));
                }
            }
        }

        Err(FxError::RateNotFound(format!(
            "No conversion path found for {} -> {} on or near {}",
            from_currency, to_currency, date
        )))
    }

    /// Rate for one unit of `from_currency`.
    pub fn get_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        self.convert_amount(Decimal::ONE, from_currency, to_currency, date)
    }
}
