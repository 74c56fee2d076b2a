//! Database models for security pricing.

use diesel::prelude::*;
use retrofolio_core::quotes::PricePoint;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal};

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::security_pricing)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SecurityPriceDB {
    pub security_id: String,
    pub date: String,
    pub price_close: String,
}

impl From<&PricePoint> for SecurityPriceDB {
    fn from(point: &PricePoint) -> Self {
        Self {
            security_id: point.security_id.clone(),
            date: format_date(point.date),
            price_close: point.close_price.to_string(),
        }
    }
}

impl TryFrom<SecurityPriceDB> for PricePoint {
    type Error = StorageError;

    fn try_from(db: SecurityPriceDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date("date", &db.date)?,
            close_price: parse_decimal("price_close", &db.price_close)?,
            security_id: db.security_id,
        })
    }
}
