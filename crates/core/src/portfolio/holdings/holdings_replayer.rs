use crate::activities::{InvestmentTransaction, TransactionCategory, TransactionStoreTrait};
use crate::errors::Result;
use crate::portfolio::holdings::Holding;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Reconstructs a portfolio's holdings as of a date by replaying its
/// investment transactions in ledger order.
#[derive(Clone)]
pub struct HoldingsReplayer {
    transaction_store: Arc<dyn TransactionStoreTrait>,
}

impl HoldingsReplayer {
    pub fn new(transaction_store: Arc<dyn TransactionStoreTrait>) -> Self {
        Self { transaction_store }
    }

    /// Holdings with a positive quantity at the end of `target_date`, ordered
    /// by security id.
    pub async fn compute_holdings(
        &self,
        portfolio_id: &str,
        target_date: NaiveDate,
    ) -> Result<Vec<Holding>> {
        let mut transactions = self
            .transaction_store
            .list_investment_transactions(portfolio_id, target_date)
            .await?;

        // Replay order must not depend on the store.
        transactions.retain(|t| t.date <= target_date);
        transactions.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));

        let holdings = replay_transactions(&transactions);
        debug!(
            "Replayed {} transactions of portfolio {} up to {}: {} holdings",
            transactions.len(),
            portfolio_id,
            target_date,
            holdings.len()
        );
        Ok(holdings)
    }
}

/// Applies transactions in the given order and returns the positions left
/// open, ordered by security id.
///
/// Buys add quantity and cost. Sells remove cost proportionally to the share
/// of the position sold (average cost). A position whose quantity drops to
/// zero or below is closed; a later buy opens a fresh one with no carried
/// cost. Other categories leave positions untouched.
pub fn replay_transactions(transactions: &[InvestmentTransaction]) -> Vec<Holding> {
    let mut holdings: HashMap<String, Holding> = HashMap::new();

    for transaction in transactions {
        if !transaction.category.moves_position() {
            continue;
        }

        let holding = holdings
            .entry(transaction.security_id.clone())
            .or_insert_with(|| Holding::new(&transaction.security_id, &transaction.currency));

        match transaction.category {
            TransactionCategory::Buy => {
                holding.quantity += transaction.quantity;
                holding.cost_basis += transaction.total_cost();
            }
            TransactionCategory::Sell => {
                if holding.quantity > Decimal::ZERO {
                    let ratio = transaction.quantity / holding.quantity;
                    holding.cost_basis *= Decimal::ONE - ratio;
                    holding.quantity -= transaction.quantity;
                } else {
                    warn!(
                        "Sell {} of {} has no open position to reduce; ignored",
                        transaction.id, transaction.security_id
                    );
                }
            }
            _ => {}
        }

        if holding.quantity <= Decimal::ZERO {
            holdings.remove(&transaction.security_id);
        }
    }

    let mut result: Vec<Holding> = holdings
        .into_values()
        .filter(|h| h.quantity > Decimal::ZERO)
        .collect();
    result.sort_by(|a, b| a.security_id.cmp(&b.security_id));
    result
}
