use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position in one security, derived by replaying the ledger up to a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub security_id: String,
    pub quantity: Decimal,
    /// Total cost attributed to the currently held quantity, in base currency.
    pub cost_basis: Decimal,
    /// Trading currency of the security, taken from the opening transaction.
    pub currency: String,
}

impl Holding {
    pub fn new(security_id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            security_id: security_id.into(),
            quantity: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    /// Average cost of one unit, or zero for an empty position.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.cost_basis / self.quantity
        }
    }
}
