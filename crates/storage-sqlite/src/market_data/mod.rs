//! SQLite storage implementation for daily security prices.

mod model;
mod repository;

pub use model::SecurityPriceDB;
pub use repository::SecurityPricingRepository;
