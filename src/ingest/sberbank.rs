//! Sberbank statement rows.
//!
//! `Сумма` is an unsigned magnitude; the sign comes from `Тип операции`.

use serde::Deserialize;
use serde_json::Value;

use super::{coerce, tinkoff::EXPENSE_LABEL, RowContext};
use crate::ledger::Transaction;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SberbankRow {
    #[serde(rename = "Номер", default)]
    pub number: Option<Value>,
    #[serde(rename = "Дата", default)]
    pub date: Option<Value>,
    #[serde(rename = "Тип операции", default)]
    pub operation_type: Option<Value>,
    #[serde(rename = "Категория", default)]
    pub category: Option<Value>,
    #[serde(rename = "Сумма", default)]
    pub amount: Option<Value>,
    #[serde(rename = "Валюта", default)]
    pub currency: Option<Value>,
    #[serde(rename = "Описание", default)]
    pub description: Option<Value>,
    #[serde(rename = "Состояние", default)]
    pub state: Option<Value>,
    #[serde(rename = "Номер счета/карты списания", default)]
    pub account: Option<Value>,
}

pub(crate) fn normalize(row: &SberbankRow, ctx: &mut RowContext<'_>) -> Transaction {
    let date = ctx.date(&[("Дата", row.date.as_ref())]);
    let magnitude = ctx.amount("Сумма", row.amount.as_ref()).abs();
    let operation_type = coerce::text_or_empty(row.operation_type.as_ref());
    if operation_type.is_empty() {
        ctx.note_reason("Тип операции", "missing; amount treated as income");
    }
    let amount = if operation_type == EXPENSE_LABEL {
        -magnitude
    } else {
        magnitude
    };
    let (category, original_category) = ctx.category(row.category.as_ref());

    let mut txn = Transaction::new(date, amount, category);
    txn.original_category = original_category;
    txn.description = coerce::text_or_empty(row.description.as_ref());
    txn.card_or_account = coerce::text_or_empty(row.account.as_ref());
    txn.status = coerce::text_or_empty(row.state.as_ref());
    txn.payment_type = operation_type;
    txn
}
