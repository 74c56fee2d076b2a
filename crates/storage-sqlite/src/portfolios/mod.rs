//! SQLite storage implementation for portfolios and user currencies.

mod model;
mod repository;

pub use model::{PortfolioDB, UserCurrencyDB};
pub use repository::PortfolioRepository;
