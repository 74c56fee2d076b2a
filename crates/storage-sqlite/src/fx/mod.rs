//! SQLite storage implementation for system and user exchange rates.

mod model;
mod repository;

pub use model::{ExchangeRateDB, UserExchangeRateDB};
pub use repository::ExchangeRateRepository;
