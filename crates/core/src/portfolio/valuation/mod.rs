mod valuation_cache;
mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_cache::{ValuationCache, MIN_SWEEP_INTERVAL};
pub use valuation_calculator::{price_for, ValuationTotals};
pub use valuation_model::{CachedValuation, PortfolioValueAtDate};
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;

#[cfg(test)]
mod valuation_service_tests;
