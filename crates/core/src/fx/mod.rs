//! FX (Foreign Exchange) module - rate models, the conversion table and the
//! store-backed currency converter.

pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use currency_converter::ExchangeRateTable;
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, RateSource};
pub use fx_service::ExchangeRateConverter;
pub use fx_traits::{CurrencyConverterTrait, ExchangeRateStoreTrait};
