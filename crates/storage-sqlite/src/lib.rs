//! SQLite storage implementation for Retrofolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the collaborator traits defined in `retrofolio-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations
//! - Repository implementations for portfolios, transactions, prices,
//!   exchange rates and account balances
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core
//! valuation engine is database-agnostic and works with traits.
//!
//! ```text
//!        core (valuation engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod activities;
pub mod balances;
pub mod fx;
pub mod market_data;
pub mod portfolios;

#[cfg(test)]
mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_blocking, run_migrations, spawn_writer,
    DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use activities::InvestmentTransactionRepository;
pub use balances::BalanceRepository;
pub use fx::ExchangeRateRepository;
pub use market_data::SecurityPricingRepository;
pub use portfolios::PortfolioRepository;

// Re-export from retrofolio-core for convenience
pub use retrofolio_core::errors::{DatabaseError, Error, Result};
