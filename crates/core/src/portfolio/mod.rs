pub mod holdings;
pub mod net_worth;
pub mod valuation;

pub use holdings::*;
pub use net_worth::*;
pub use valuation::*;
