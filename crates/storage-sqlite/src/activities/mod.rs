//! SQLite storage implementation for investment transactions.

mod model;
mod repository;

pub use model::InvestmentTransactionDB;
pub use repository::InvestmentTransactionRepository;
