//! Best-effort conversion of loosely-typed spreadsheet cells.

use serde_json::Value;

use crate::ledger::StatementDate;

/// Why a cell could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellIssue {
    Missing,
    Invalid(String),
}

impl CellIssue {
    pub fn describe(&self) -> String {
        match self {
            Self::Missing => "missing".to_string(),
            Self::Invalid(raw) => format!("unparseable value `{raw}`"),
        }
    }
}

/// Trimmed, non-empty textual content of a cell.
pub fn text(cell: Option<&Value>) -> Option<String> {
    let raw = match cell? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

pub fn text_or_empty(cell: Option<&Value>) -> String {
    text(cell).unwrap_or_default()
}

/// Largest magnitude an amount cell may carry; bucket totals stay finite well past it.
pub const MAX_AMOUNT: f64 = 1e15;

pub fn amount(cell: Option<&Value>) -> Result<f64, CellIssue> {
    match cell {
        None | Some(Value::Null) => Err(CellIssue::Missing),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| within_limit(*v))
            .ok_or_else(|| CellIssue::Invalid(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CellIssue::Missing),
        Some(Value::String(s)) => parse_amount(s)
            .filter(|v| within_limit(*v))
            .ok_or_else(|| CellIssue::Invalid(s.clone())),
        Some(other) => Err(CellIssue::Invalid(other.to_string())),
    }
}

fn within_limit(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_AMOUNT
}

/// Parses amounts as banks print them: `-1 234,56 ₽`, `(15.00)`, `1,234.50`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\u{a0}' | '\u{202f}' | '₽' | '$' | '€'))
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    for suffix in ["RUB", "руб.", "руб"] {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
        }
    }

    let (negated, body) = match cleaned
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner.to_string()),
        None => (false, cleaned),
    };

    let normalized = if body.contains('.') {
        body.replace(',', "")
    } else {
        body.replace(',', ".")
    };
    let value: f64 = normalized.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(if negated { -value } else { value })
}

pub fn date(cell: Option<&Value>) -> Result<StatementDate, CellIssue> {
    match cell {
        None | Some(Value::Null) => Err(CellIssue::Missing),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CellIssue::Missing),
        Some(Value::String(s)) => {
            StatementDate::parse(s).ok_or_else(|| CellIssue::Invalid(s.clone()))
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(StatementDate::from_serial)
            .ok_or_else(|| CellIssue::Invalid(n.to_string())),
        Some(other) => Err(CellIssue::Invalid(other.to_string())),
    }
}
