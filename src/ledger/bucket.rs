use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Transaction;

const RELATIVE_TOLERANCE: f64 = 1e-6;

/// Compares two currency sums within floating-point tolerance.
pub fn amounts_match(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= RELATIVE_TOLERANCE * scale
}

/// Named grouping of transactions with running totals.
///
/// `total` and `total_cashback` always equal the sums over `transactions`; the
/// fields are private so every change goes through a method that keeps them so.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    total: f64,
    total_cashback: f64,
    transactions: Vec<Transaction>,
}

impl CategoryBucket {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut bucket = Self::empty();
        bucket.extend(transactions);
        bucket
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn total_cashback(&self) -> f64 {
        self.total_cashback
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.transactions.iter().any(|txn| txn.id == id)
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.total += transaction.amount;
        self.total_cashback += transaction.cashback;
        self.transactions.push(transaction);
    }

    pub fn extend(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        for transaction in transactions {
            self.push(transaction);
        }
    }

    /// Splits into `(moved, remaining)` by id, keeping relative order in both.
    pub fn partition(&self, ids: &BTreeSet<Uuid>) -> (Vec<Transaction>, Vec<Transaction>) {
        self.transactions
            .iter()
            .cloned()
            .partition(|txn| ids.contains(&txn.id))
    }

    /// True when the stored totals agree with the transactions they summarize.
    pub fn is_consistent(&self) -> bool {
        let (amount, cashback) = self
            .transactions
            .iter()
            .fold((0.0, 0.0), |(a, c), txn| (a + txn.amount, c + txn.cashback));
        amounts_match(self.total, amount) && amounts_match(self.total_cashback, cashback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StatementDate;

    fn txn(amount: f64, cashback: f64) -> Transaction {
        Transaction::new(StatementDate::Unknown, amount, "Test").with_cashback(cashback)
    }

    #[test]
    fn totals_follow_pushes() {
        let mut bucket = CategoryBucket::empty();
        bucket.push(txn(-500.0, 10.0));
        bucket.push(txn(200.0, 0.0));
        assert_eq!(bucket.total(), -300.0);
        assert_eq!(bucket.total_cashback(), 10.0);
        assert_eq!(bucket.len(), 2);
        assert!(bucket.is_consistent());
    }

    #[test]
    fn partition_preserves_order() {
        let items = vec![txn(-1.0, 0.0), txn(-2.0, 0.0), txn(-3.0, 0.0), txn(-4.0, 0.0)];
        let ids: BTreeSet<Uuid> = [items[3].id, items[1].id].into_iter().collect();
        let bucket = CategoryBucket::from_transactions(items);
        let (moved, remaining) = bucket.partition(&ids);
        let moved: Vec<f64> = moved.iter().map(|t| t.amount).collect();
        let remaining: Vec<f64> = remaining.iter().map(|t| t.amount).collect();
        assert_eq!(moved, vec![-2.0, -4.0]);
        assert_eq!(remaining, vec![-1.0, -3.0]);
    }

    #[test]
    fn tampered_totals_are_detected() {
        let json = r#"{"total": 5.0, "totalCashback": 0.0, "transactions": []}"#;
        let bucket: CategoryBucket = serde_json::from_str(json).unwrap();
        assert!(!bucket.is_consistent());
    }

    #[test]
    fn tolerance_absorbs_float_noise() {
        assert!(amounts_match(0.1 + 0.2, 0.3));
        assert!(!amounts_match(0.3, 0.31));
    }
}
