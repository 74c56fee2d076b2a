//! Retrofolio Core - historical portfolio valuation engine.
//!
//! Replays investment ledgers to reconstruct holdings on any date, values
//! them with carry-forward prices, caches the results and aggregates them
//! across a user's portfolios. The crate is database-agnostic; storage is
//! reached through the traits implemented by `retrofolio-storage-sqlite`.

pub mod activities;
pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod portfolios;
pub mod quotes;
pub mod utils;

#[cfg(test)]
mod testing;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
