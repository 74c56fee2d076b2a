//! Utility functions for SQLite storage operations.
//!
//! Chunking keeps `IN (...)` queries under SQLite's parameter limit; the
//! parse helpers decode the TEXT columns used for decimals, days and
//! timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use retrofolio_core::constants::DATE_FORMAT;
pub use retrofolio_core::utils::time_utils::format_date;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite's compile-time limit (SQLITE_MAX_VARIABLE_NUMBER) is typically 999;
/// 500 leaves room for the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into slices of at most `SQLITE_MAX_PARAMS_CHUNK` items.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Rows per multi-row INSERT for a table with `columns` bound columns.
pub fn rows_per_insert(columns: usize) -> usize {
    (SQLITE_MAX_PARAMS_CHUNK / columns.max(1)).max(1)
}

pub fn parse_decimal(column: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value.trim())
        .or_else(|_| Decimal::from_scientific(value.trim()))
        .map_err(|e| StorageError::InvalidValue(format!("{} '{}': {}", column, value, e)))
}

pub fn parse_date(column: &str, value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| StorageError::InvalidValue(format!("{} '{}': {}", column, value, e)))
}

pub fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidValue(format!("{} '{}': {}", column, value, e)))
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}
