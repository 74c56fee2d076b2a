//! In-memory valuation cache keyed by (user, portfolio, date) with a TTL.
//!
//! The user is part of the key so that a hit is only served to the user whose
//! ownership check and base currency produced it.
//!
//! Entries older than the TTL are never served; they are recomputed on the
//! next read and dropped by the periodic sweep. The cache is not a system of
//! record and holds no errors.

use chrono::{Duration, NaiveDate};
use dashmap::DashMap;
use log::{debug, warn};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::valuation_model::{CachedValuation, PortfolioValueAtDate};
use crate::clock::Clock;
use crate::config::ValuationConfig;

type CacheKey = (String, String, NaiveDate);

/// Shortest interval `spawn_sweeper` accepts.
pub const MIN_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

pub struct ValuationCache {
    entries: DashMap<CacheKey, CachedValuation>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ValuationCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn from_config(config: &ValuationConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.cache_ttl, clock)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh valuation for the key, if any.
    pub fn get(
        &self,
        user_id: &str,
        portfolio_id: &str,
        date: NaiveDate,
    ) -> Option<PortfolioValueAtDate> {
        let now = self.clock.now();
        self.entries
            .get(&(user_id.to_string(), portfolio_id.to_string(), date))
            .filter(|entry| now - entry.value().computed_at < self.ttl)
            .map(|entry| entry.value().valuation.clone())
    }

    /// Stores a valuation stamped with the current time, replacing any
    /// previous entry for the same key.
    pub fn insert(&self, user_id: &str, portfolio_id: &str, valuation: PortfolioValueAtDate) {
        let key = (user_id.to_string(), portfolio_id.to_string(), valuation.date);
        self.entries.insert(
            key,
            CachedValuation {
                valuation,
                computed_at: self.clock.now(),
            },
        );
    }

    /// Removes expired entries and returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now - entry.computed_at < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    /// Drops every entry of one portfolio, for all users.
    pub fn invalidate_portfolio(&self, portfolio_id: &str) {
        self.entries.retain(|(_, id, _), _| id != portfolio_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Starts a background task sweeping expired entries every `every`.
    ///
    /// The task holds a weak reference and ends once the cache is dropped.
    /// Intervals below `MIN_SWEEP_INTERVAL` are raised to it. Must be called
    /// inside a Tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: std::time::Duration) -> JoinHandle<()> {
        if every < MIN_SWEEP_INTERVAL {
            warn!(
                "Sweep interval {:?} is below {:?}; using the minimum",
                every, MIN_SWEEP_INTERVAL
            );
        }
        let every = every.max(MIN_SWEEP_INTERVAL);
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Valuation cache dropped, stopping sweeper");
                    break;
                };
                let removed = cache.sweep_expired();
                if removed > 0 {
                    debug!(
                        "Swept {} expired valuations ({} remaining)",
                        removed,
                        cache.len()
                    );
                }
            }
        })
    }
}
