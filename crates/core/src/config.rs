//! Runtime configuration for the valuation engine.
//!
//! Every knob has a default (30 day cache TTL, hourly sweep). Hosts may
//! override them through environment variables.

use std::time::Duration as StdDuration;

use chrono::Duration;
use log::debug;

use crate::constants::{
    DEFAULT_MAX_CONCURRENT_VALUATIONS, DEFAULT_VALUATION_TIMEOUT_SECS,
    VALUATION_CACHE_SWEEP_INTERVAL_SECS, VALUATION_CACHE_TTL_DAYS,
};
use crate::errors::{Error, Result};

pub const ENV_CACHE_TTL_DAYS: &str = "RETROFOLIO_CACHE_TTL_DAYS";
pub const ENV_CACHE_SWEEP_INTERVAL_SECS: &str = "RETROFOLIO_CACHE_SWEEP_INTERVAL_SECS";
pub const ENV_MAX_CONCURRENT_VALUATIONS: &str = "RETROFOLIO_MAX_CONCURRENT_VALUATIONS";
pub const ENV_VALUATION_TIMEOUT_SECS: &str = "RETROFOLIO_VALUATION_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ValuationConfig {
    /// How long a cached valuation stays valid after it was computed.
    pub cache_ttl: Duration,
    /// How often the background sweeper drops expired cache entries.
    pub sweep_interval: StdDuration,
    /// Maximum number of cache misses computed concurrently per range request.
    pub max_concurrent_valuations: usize,
    /// Deadline for one single-date valuation. `None` disables the deadline.
    pub valuation_timeout: Option<StdDuration>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::days(VALUATION_CACHE_TTL_DAYS),
            sweep_interval: StdDuration::from_secs(VALUATION_CACHE_SWEEP_INTERVAL_SECS),
            max_concurrent_valuations: DEFAULT_MAX_CONCURRENT_VALUATIONS,
            valuation_timeout: Some(StdDuration::from_secs(DEFAULT_VALUATION_TIMEOUT_SECS)),
        }
    }
}

impl ValuationConfig {
    /// Builds the configuration from the process environment, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// A timeout of `0` seconds disables the per-valuation deadline.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(days) = parse_var::<i64, _>(&lookup, ENV_CACHE_TTL_DAYS)? {
            if days <= 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be positive, got {}",
                    ENV_CACHE_TTL_DAYS, days
                )));
            }
            config.cache_ttl = Duration::try_days(days).ok_or_else(|| {
                Error::InvalidConfigValue(format!("{} is out of range: {}", ENV_CACHE_TTL_DAYS, days))
            })?;
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CACHE_SWEEP_INTERVAL_SECS)? {
            if secs == 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be positive",
                    ENV_CACHE_SWEEP_INTERVAL_SECS
                )));
            }
            config.sweep_interval = StdDuration::from_secs(secs);
        }

        if let Some(limit) = parse_var::<usize, _>(&lookup, ENV_MAX_CONCURRENT_VALUATIONS)? {
            if limit == 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be at least 1",
                    ENV_MAX_CONCURRENT_VALUATIONS
                )));
            }
            config.max_concurrent_valuations = limit;
        }

        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_VALUATION_TIMEOUT_SECS)? {
            config.valuation_timeout = (secs > 0).then(|| StdDuration::from_secs(secs));
        }

        debug!("Valuation config resolved: {:?}", config);
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::InvalidConfigValue(format!("{}={:?}: {}", key, raw, e))
        }),
    }
}
