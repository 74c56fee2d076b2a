use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin of an exchange rate. User-defined rates take precedence over
/// system rates for the same pair and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateSource {
    System,
    User,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::System => "SYSTEM",
            RateSource::User => "USER",
        }
    }
}

impl FromStr for RateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(RateSource::System),
            "USER" => Ok(RateSource::User),
            other => Err(format!("Unknown rate source: {}", other)),
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of `from_currency` is worth `rate` units of `to_currency` on `date`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub date: NaiveDate,
    pub rate: Decimal,
    pub source: RateSource,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        date: NaiveDate,
        rate: Decimal,
        source: RateSource,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            date,
            rate,
            source,
        }
    }

    /// Pair symbol in `EUR/USD` form, used in log and error messages.
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.from_currency, self.to_currency)
    }
}
