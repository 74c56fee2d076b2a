//! Carry-forward price resolution.
//!
//! For every requested (security, date) pair the resolver returns the closing
//! price on that exact date when one exists, otherwise the most recent earlier
//! closing price. Pairs with no price on or before the date are left out of
//! the result; callers must treat absence as "no price", never as zero.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::quotes_model::PricePoint;
use super::quotes_traits::PriceStoreTrait;
use crate::errors::Result;

/// Lookup key of a resolved price: (security id, requested date).
pub type PriceKey = (String, NaiveDate);

#[derive(Clone)]
pub struct PriceResolver {
    price_store: Arc<dyn PriceStoreTrait>,
}

impl PriceResolver {
    pub fn new(price_store: Arc<dyn PriceStoreTrait>) -> Self {
        Self { price_store }
    }

    /// Resolves carry-forward prices for every security and date combination
    /// with a single store fetch.
    pub async fn resolve_prices(
        &self,
        security_ids: &[String],
        dates: &[NaiveDate],
    ) -> Result<HashMap<PriceKey, Decimal>> {
        let max_date = match dates.iter().max() {
            Some(date) if !security_ids.is_empty() => *date,
            _ => return Ok(HashMap::new()),
        };

        let points = self.price_store.list_prices(security_ids, max_date).await?;
        debug!(
            "Resolving {} securities x {} dates from {} price points (max date {})",
            security_ids.len(),
            dates.len(),
            points.len(),
            max_date
        );

        let series_by_security = group_by_security(points);
        let mut resolved = HashMap::with_capacity(security_ids.len() * dates.len());

        for security_id in security_ids {
            let Some(series) = series_by_security.get(security_id) else {
                continue;
            };
            for date in dates {
                if let Some(price) = resolve_price_on(series, *date) {
                    resolved.insert((security_id.clone(), *date), price);
                }
            }
        }

        Ok(resolved)
    }
}

/// Groups price points by security into date-ascending series.
///
/// When a security has several points on the same date, the first one in
/// input order wins.
pub fn group_by_security(points: Vec<PricePoint>) -> HashMap<String, Vec<(NaiveDate, Decimal)>> {
    let mut grouped: HashMap<String, Vec<(NaiveDate, Decimal)>> = HashMap::new();
    for point in points {
        grouped
            .entry(point.security_id)
            .or_default()
            .push((point.date, point.close_price));
    }

    for series in grouped.values_mut() {
        // Stable sort keeps input order among same-day points for dedup_by_key.
        series.sort_by_key(|(date, _)| *date);
        series.dedup_by_key(|(date, _)| *date);
    }

    grouped
}

/// Latest price on or before `date` in a date-ascending series.
pub fn resolve_price_on(series: &[(NaiveDate, Decimal)], date: NaiveDate) -> Option<Decimal> {
    let idx = series.partition_point(|(point_date, _)| *point_date <= date);
    idx.checked_sub(1).map(|i| series[i].1)
}
