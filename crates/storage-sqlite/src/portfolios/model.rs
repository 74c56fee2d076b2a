//! Database models for portfolios.

use chrono::Utc;
use diesel::prelude::*;
use retrofolio_core::portfolios::Portfolio;

use crate::utils::format_timestamp;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub is_enabled: bool,
    pub created_at: String,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            is_enabled: db.is_enabled,
        }
    }
}

impl From<&Portfolio> for PortfolioDB {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            id: portfolio.id.clone(),
            user_id: portfolio.user_id.clone(),
            name: portfolio.name.clone(),
            is_enabled: portfolio.is_enabled,
            created_at: format_timestamp(Utc::now()),
        }
    }
}

/// A currency a user works with; exactly one row per user is the default.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users_currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserCurrencyDB {
    pub user_id: String,
    pub currency_code: String,
    pub is_default_currency: bool,
}
