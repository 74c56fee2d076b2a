//! Quotes module - daily closing prices and carry-forward resolution.

mod price_resolver;
mod quotes_model;
mod quotes_traits;

pub use price_resolver::{group_by_security, resolve_price_on, PriceKey, PriceResolver};
pub use quotes_model::PricePoint;
pub use quotes_traits::PriceStoreTrait;
