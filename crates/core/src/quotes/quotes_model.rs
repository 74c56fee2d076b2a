use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily closing price of a security. Series are sparse: weekends, holidays
/// and thinly traded days have no point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub security_id: String,
    pub date: NaiveDate,
    pub close_price: Decimal,
}
