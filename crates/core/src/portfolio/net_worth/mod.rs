//! Net worth module.
//!
//! Sums portfolio valuations across a user's portfolios and combines them
//! with cash account balances into a daily history.

mod net_worth_model;
mod net_worth_service;
mod net_worth_traits;

pub use net_worth_model::*;
pub use net_worth_service::*;
pub use net_worth_traits::*;
