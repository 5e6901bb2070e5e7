//! Tinkoff statement rows.
//!
//! Amounts arrive already signed (negative for spending); cashback comes from the
//! `Кэшбэк` column with `Бонусы` as the older spelling.

use serde::Deserialize;
use serde_json::Value;

use super::{coerce, RowContext};
use crate::ledger::Transaction;

pub const EXPENSE_LABEL: &str = "Расходы";
pub const INCOME_LABEL: &str = "Доходы";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TinkoffRow {
    #[serde(rename = "Дата операции", default)]
    pub operation_date: Option<Value>,
    #[serde(rename = "Дата платежа", default)]
    pub payment_date: Option<Value>,
    #[serde(rename = "Номер карты", default)]
    pub card_number: Option<Value>,
    #[serde(rename = "Статус", default)]
    pub status: Option<Value>,
    #[serde(rename = "Сумма операции", default)]
    pub amount: Option<Value>,
    #[serde(rename = "Валюта операции", default)]
    pub currency: Option<Value>,
    #[serde(rename = "Категория", default)]
    pub category: Option<Value>,
    #[serde(rename = "MCC", default)]
    pub mcc: Option<Value>,
    #[serde(rename = "Описание", default)]
    pub description: Option<Value>,
    #[serde(rename = "Кэшбэк", default)]
    pub cashback: Option<Value>,
    #[serde(rename = "Бонусы", default)]
    pub bonuses: Option<Value>,
}

pub(crate) fn normalize(row: &TinkoffRow, ctx: &mut RowContext<'_>) -> Transaction {
    let date = ctx.date(&[
        ("Дата операции", row.operation_date.as_ref()),
        ("Дата платежа", row.payment_date.as_ref()),
    ]);
    let amount = ctx.amount("Сумма операции", row.amount.as_ref());
    let cashback = ctx.cashback(&[
        ("Кэшбэк", row.cashback.as_ref()),
        ("Бонусы", row.bonuses.as_ref()),
    ]);
    let (category, original_category) = ctx.category(row.category.as_ref());

    let mut txn = Transaction::new(date, amount, category);
    txn.original_category = original_category;
    txn.description = coerce::text_or_empty(row.description.as_ref());
    txn.card_or_account = coerce::text_or_empty(row.card_number.as_ref());
    txn.status = coerce::text_or_empty(row.status.as_ref());
    txn.payment_type = if amount < 0.0 { EXPENSE_LABEL } else { INCOME_LABEL }.to_string();
    txn.mcc_code = coerce::text(row.mcc.as_ref());
    txn.cashback = cashback;
    txn
}
