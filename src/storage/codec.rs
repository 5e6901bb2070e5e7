//! Snapshot encoding of the full category map.
//!
//! The payload is `{ "categories": { name: { total, totalCashback, transactions } } }`.
//! Decoding validates the whole payload before handing anything back, so a
//! rejected snapshot never leaks partial state.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    errors::LedgerError,
    ledger::{Categories, CategoryBucket},
};

const CATEGORIES_FIELD: &str = "categories";

#[derive(Serialize)]
struct SnapshotRef<'a> {
    categories: &'a Categories,
}

pub fn serialize(categories: &Categories) -> Result<Value, LedgerError> {
    Ok(serde_json::to_value(SnapshotRef { categories })?)
}

pub fn deserialize(value: Value) -> Result<Categories, LedgerError> {
    decode(value).map_err(|reason| {
        warn!(%reason, "rejected snapshot");
        LedgerError::MalformedState(reason)
    })
}

pub fn to_json_string(categories: &Categories) -> Result<String, LedgerError> {
    Ok(serde_json::to_string_pretty(&SnapshotRef { categories })?)
}

/// Parses snapshot text. Text that is not JSON at all is reported as malformed state.
pub fn from_json_str(data: &str) -> Result<Categories, LedgerError> {
    let value: Value = serde_json::from_str(data)
        .map_err(|err| LedgerError::MalformedState(format!("snapshot is not valid JSON: {err}")))?;
    deserialize(value)
}

fn decode(value: Value) -> Result<Categories, String> {
    let mut root = match value {
        Value::Object(map) => map,
        other => return Err(format!("expected an object, found {}", kind(&other))),
    };
    let buckets = match root.remove(CATEGORIES_FIELD) {
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(format!(
                "`{CATEGORIES_FIELD}` must be an object, found {}",
                kind(&other)
            ))
        }
        None => return Err(format!("missing `{CATEGORIES_FIELD}`")),
    };

    let mut categories = Categories::new();
    let mut seen = BTreeSet::new();
    for (name, raw) in buckets {
        if name.trim().is_empty() {
            return Err("category name cannot be empty".into());
        }
        let bucket: CategoryBucket = serde_json::from_value(raw)
            .map_err(|err| format!("category `{name}`: {err}"))?;
        if !bucket.is_consistent() {
            return Err(format!(
                "category `{name}`: totals do not match its transactions"
            ));
        }
        for txn in bucket.transactions() {
            if !seen.insert(txn.id) {
                return Err(format!("transaction {} appears more than once", txn.id));
            }
        }
        categories.insert(name, bucket);
    }
    debug!(
        buckets = categories.len(),
        transactions = categories.transaction_count(),
        "decoded snapshot"
    );
    Ok(categories)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::CategoryService;
    use crate::ledger::{StatementDate, Transaction};
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample() -> Categories {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap();
        let mut coffee = Transaction::new(StatementDate::Moment(date), -0.1 - 0.2, "Cafe")
            .with_description("Coffee")
            .with_cashback(0.03);
        coffee.original_category = Some("Рестораны".into());
        coffee.mcc_code = Some("5814".into());
        let mut categories = CategoryService::group(vec![
            coffee,
            Transaction::new(StatementDate::Unknown, 1234.56, "Salary"),
        ]);
        CategoryService::add(&mut categories, "Empty").unwrap();
        categories
    }

    #[test]
    fn text_round_trip_is_exact() {
        let categories = sample();
        let text = to_json_string(&categories).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), categories);
        assert_eq!(deserialize(serialize(&categories).unwrap()).unwrap(), categories);
    }

    #[test]
    fn missing_ids_are_assigned() {
        let value = json!({
            "categories": {
                "Cafe": {
                    "total": -50.0,
                    "totalCashback": 0.0,
                    "transactions": [
                        { "date": "01.02.2024", "amount": -20.0, "category": "Cafe", "cardNumber": "*1" },
                        { "date": "", "amount": -30.0, "category": "Cafe" }
                    ]
                }
            }
        });
        let categories = deserialize(value).unwrap();
        let bucket = categories.get("Cafe").unwrap();
        assert_eq!(bucket.len(), 2);
        assert_ne!(bucket.transactions()[0].id, bucket.transactions()[1].id);
        assert_eq!(bucket.transactions()[0].card_or_account, "*1");
    }

    #[test]
    fn rejects_bad_payloads() {
        let cases = vec![
            json!([]),
            json!({}),
            json!({ "categories": [] }),
            json!({ "categories": { "": { "total": 0.0, "totalCashback": 0.0, "transactions": [] } } }),
            json!({ "categories": { "A": { "total": 0.0, "transactions": [] } } }),
            json!({ "categories": { "A": { "total": 9.0, "totalCashback": 0.0, "transactions": [] } } }),
            json!({ "categories": { "A": { "total": 0.0, "totalCashback": 0.0, "transactions": [ { "amount": "x" } ] } } }),
        ];
        for case in cases {
            let err = deserialize(case.clone()).unwrap_err();
            assert!(
                matches!(err, LedgerError::MalformedState(_)),
                "expected malformed state for {case}"
            );
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let id = uuid::Uuid::new_v4();
        let txn = json!({ "id": id, "amount": -1.0, "category": "A" });
        let value = json!({
            "categories": {
                "A": { "total": -1.0, "totalCashback": 0.0, "transactions": [txn.clone()] },
                "B": { "total": -1.0, "totalCashback": 0.0, "transactions": [txn] }
            }
        });
        assert!(matches!(
            deserialize(value),
            Err(LedgerError::MalformedState(reason)) if reason.contains("more than once")
        ));
    }

    #[test]
    fn garbage_text_is_malformed() {
        assert!(matches!(
            from_json_str("not json"),
            Err(LedgerError::MalformedState(_))
        ));
    }
}
