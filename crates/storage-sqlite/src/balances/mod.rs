//! SQLite storage implementation for daily cash account balances.

mod model;
mod repository;

pub use model::BalanceDB;
pub use repository::BalanceRepository;
