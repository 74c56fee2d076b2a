//! Activities module - the investment transaction ledger the engine replays.

mod activities_model;
mod activities_traits;

pub use activities_model::{InvestmentTransaction, TransactionCategory};
pub use activities_traits::TransactionStoreTrait;
