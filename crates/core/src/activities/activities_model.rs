//! Investment transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CATEGORY_BUY: &str = "buy";
pub const CATEGORY_SELL: &str = "sell";
pub const CATEGORY_DIVIDEND: &str = "dividend";
pub const CATEGORY_TRANSFER: &str = "transfer";
pub const CATEGORY_FEE: &str = "fee";
pub const CATEGORY_TAX: &str = "tax";
pub const CATEGORY_CANCEL: &str = "cancel";
pub const CATEGORY_OTHER: &str = "other";

/// Ledger category of an investment transaction.
///
/// Only `Buy` and `Sell` move quantity and cost basis. The remaining
/// categories affect cash balances, which are tracked outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Buy,
    Sell,
    Dividend,
    Transfer,
    Fee,
    Tax,
    Cancel,
    Other,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Buy => CATEGORY_BUY,
            TransactionCategory::Sell => CATEGORY_SELL,
            TransactionCategory::Dividend => CATEGORY_DIVIDEND,
            TransactionCategory::Transfer => CATEGORY_TRANSFER,
            TransactionCategory::Fee => CATEGORY_FEE,
            TransactionCategory::Tax => CATEGORY_TAX,
            TransactionCategory::Cancel => CATEGORY_CANCEL,
            TransactionCategory::Other => CATEGORY_OTHER,
        }
    }

    /// Whether transactions of this category change quantity or cost basis.
    pub fn moves_position(&self) -> bool {
        matches!(self, TransactionCategory::Buy | TransactionCategory::Sell)
    }
}

impl FromStr for TransactionCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            CATEGORY_BUY => Ok(TransactionCategory::Buy),
            CATEGORY_SELL => Ok(TransactionCategory::Sell),
            CATEGORY_DIVIDEND => Ok(TransactionCategory::Dividend),
            CATEGORY_TRANSFER => Ok(TransactionCategory::Transfer),
            CATEGORY_FEE => Ok(TransactionCategory::Fee),
            CATEGORY_TAX => Ok(TransactionCategory::Tax),
            CATEGORY_CANCEL => Ok(TransactionCategory::Cancel),
            CATEGORY_OTHER => Ok(TransactionCategory::Other),
            other => Err(format!("Unknown transaction category: {}", other)),
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger entry for a security inside a portfolio.
///
/// `ref_amount` and `ref_fees` are already expressed in the user's base
/// currency; `currency` is the security's trading currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTransaction {
    pub id: String,
    pub portfolio_id: String,
    pub security_id: String,
    pub date: NaiveDate,
    pub category: TransactionCategory,
    pub quantity: Decimal,
    pub ref_amount: Decimal,
    pub ref_fees: Decimal,
    pub currency: String,
    /// Creation time, the tie-breaker for transactions sharing a date.
    pub created_at: DateTime<Utc>,
}

impl InvestmentTransaction {
    /// Amount attributed to cost basis on a buy: amount plus fees.
    pub fn total_cost(&self) -> Decimal {
        self.ref_amount + self.ref_fees
    }
}
