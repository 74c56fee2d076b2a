//! Database models for investment transactions.

use diesel::prelude::*;
use retrofolio_core::activities::{InvestmentTransaction, TransactionCategory};

use crate::errors::StorageError;
use crate::utils::{format_date, format_timestamp, parse_date, parse_decimal, parse_timestamp};

/// Database row for an investment transaction. Amounts, days and timestamps
/// are stored as TEXT to keep decimal precision.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::investment_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentTransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub security_id: String,
    pub category: String,
    pub date: String,
    pub quantity: String,
    pub ref_amount: String,
    pub ref_fees: String,
    pub currency: String,
    pub created_at: String,
}

impl From<&InvestmentTransaction> for InvestmentTransactionDB {
    fn from(tx: &InvestmentTransaction) -> Self {
        Self {
            id: tx.id.clone(),
            portfolio_id: tx.portfolio_id.clone(),
            security_id: tx.security_id.clone(),
            category: tx.category.as_str().to_string(),
            date: format_date(tx.date),
            quantity: tx.quantity.to_string(),
            ref_amount: tx.ref_amount.to_string(),
            ref_fees: tx.ref_fees.to_string(),
            currency: tx.currency.clone(),
            created_at: format_timestamp(tx.created_at),
        }
    }
}

impl TryFrom<InvestmentTransactionDB> for InvestmentTransaction {
    type Error = StorageError;

    fn try_from(db: InvestmentTransactionDB) -> Result<Self, Self::Error> {
        let category = db
            .category
            .parse::<TransactionCategory>()
            .map_err(|e| StorageError::InvalidValue(format!("transaction {}: {}", db.id, e)))?;

        Ok(Self {
            category,
            date: parse_date("date", &db.date)?,
            quantity: parse_decimal("quantity", &db.quantity)?,
            ref_amount: parse_decimal("ref_amount", &db.ref_amount)?,
            ref_fees: parse_decimal("ref_fees", &db.ref_fees)?,
            created_at: parse_timestamp("created_at", &db.created_at)?,
            id: db.id,
            portfolio_id: db.portfolio_id,
            security_id: db.security_id,
            currency: db.currency,
        })
    }
}
