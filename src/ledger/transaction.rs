use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::StatementDate;

/// Label used when a provider row carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Canonical, bank-agnostic statement record.
///
/// Transactions are value objects: the engine moves and reorders them but never
/// edits one in place. `id` is assigned at normalization and is what selections
/// and transfers refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub date: StatementDate,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_category: Option<String>,
    #[serde(default, alias = "cardNumber")]
    pub card_or_account: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcc_code: Option<String>,
    #[serde(default)]
    pub cashback: f64,
}

impl Transaction {
    pub fn new(date: StatementDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            description: String::new(),
            category: category.into(),
            original_category: None,
            card_or_account: String::new(),
            status: String::new(),
            payment_type: String::new(),
            mcc_code: None,
            cashback: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cashback(mut self, cashback: f64) -> Self {
        self.cashback = cashback;
        self
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// The category label as the provider reported it.
    pub fn source_category(&self) -> &str {
        self.original_category.as_deref().unwrap_or(&self.category)
    }
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}
