use std::collections::BTreeSet;

use crate::ledger::{amounts_match, Categories};

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub transaction_count: usize,
    pub total: f64,
    pub total_cashback: f64,
}

/// Income and spending across buckets, excluding transfer-like ones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub income: f64,
    pub expense: f64,
    pub cashback: f64,
    pub transaction_count: usize,
}

impl Statistics {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn overview(categories: &Categories) -> Vec<CategorySummary> {
        let mut rows: Vec<CategorySummary> = categories
            .iter()
            .map(|(name, bucket)| CategorySummary {
                name: name.to_string(),
                transaction_count: bucket.len(),
                total: bucket.total(),
                total_cashback: bucket.total_cashback(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    pub fn statistics(categories: &Categories, excluded: &[String]) -> Statistics {
        categories
            .iter()
            .filter(|(name, _)| !excluded.iter().any(|skip| skip == name))
            .flat_map(|(_, bucket)| bucket.transactions())
            .fold(Statistics::default(), |mut stats, txn| {
                if txn.amount > 0.0 {
                    stats.income += txn.amount;
                } else {
                    stats.expense += txn.amount.abs();
                }
                stats.cashback += txn.cashback;
                stats.transaction_count += 1;
                stats
            })
    }

    /// Human-readable consistency problems; empty for a healthy map.
    pub fn warnings(categories: &Categories) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = BTreeSet::new();
        for (name, bucket) in categories.iter() {
            let (amount, cashback) = bucket
                .transactions()
                .iter()
                .fold((0.0, 0.0), |(a, c), txn| (a + txn.amount, c + txn.cashback));
            if !amounts_match(bucket.total(), amount) {
                warnings.push(format!(
                    "Category `{}` total {} differs from its transactions ({})",
                    name,
                    bucket.total(),
                    amount
                ));
            }
            if !amounts_match(bucket.total_cashback(), cashback) {
                warnings.push(format!(
                    "Category `{}` cashback {} differs from its transactions ({})",
                    name,
                    bucket.total_cashback(),
                    cashback
                ));
            }
            for txn in bucket.transactions() {
                if !seen.insert(txn.id) {
                    warnings.push(format!("Transaction {} appears more than once", txn.id));
                }
            }
        }
        warnings
    }
}
