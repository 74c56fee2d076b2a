//! Portfolios module - portfolio directory and base currency contracts.

mod portfolios_model;
mod portfolios_traits;

pub use portfolios_model::Portfolio;
pub use portfolios_traits::{BaseCurrencyLookupTrait, PortfolioDirectoryTrait};
