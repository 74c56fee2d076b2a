/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Storage and wire format for calendar days
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cached portfolio valuations are recomputed after this many days
pub const VALUATION_CACHE_TTL_DAYS: i64 = 30;

/// Interval between sweeps of expired cache entries (1 hour)
pub const VALUATION_CACHE_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Upper bound on single-date valuations computed at once for one range request
pub const DEFAULT_MAX_CONCURRENT_VALUATIONS: usize = 8;

/// Deadline for one single-date valuation, including every store round trip
pub const DEFAULT_VALUATION_TIMEOUT_SECS: u64 = 120;
