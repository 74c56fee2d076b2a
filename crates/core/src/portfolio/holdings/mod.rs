mod holdings_model;
mod holdings_replayer;

pub use holdings_model::Holding;
pub use holdings_replayer::{replay_transactions, HoldingsReplayer};
