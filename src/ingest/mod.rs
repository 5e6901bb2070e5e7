//! Row normalization: turns provider-specific statement rows into canonical
//! [`Transaction`]s.
//!
//! Each supported bank is a [`Provider`] with its own typed row shape. Rows are
//! never dropped: unusable cells are replaced with defaults and reported as
//! [`MalformedRow`] issues alongside the result.

pub mod coerce;
pub mod mapping;
pub mod sberbank;
pub mod tinkoff;

use std::{fmt, str::FromStr};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    errors::LedgerError,
    ledger::{StatementDate, Transaction, UNCATEGORIZED},
};

pub use coerce::CellIssue;
pub use mapping::CategoryMapping;
pub use sberbank::SberbankRow;
pub use tinkoff::TinkoffRow;

/// Supported statement formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Tinkoff,
    Sberbank,
}

const ALL_PROVIDERS: &[Provider] = &[Provider::Tinkoff, Provider::Sberbank];

impl Provider {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tinkoff => "tinkoff",
            Self::Sberbank => "sberbank",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tinkoff => "Tinkoff",
            Self::Sberbank => "Sberbank",
        }
    }

    pub fn all() -> &'static [Provider] {
        ALL_PROVIDERS
    }

    /// Reads one raw row object into this provider's row shape.
    ///
    /// A value that is not a row object yields an empty row plus the reason.
    pub fn decode(&self, raw: Value) -> (ProviderRow, Option<String>) {
        match self {
            Self::Tinkoff => match serde_json::from_value::<TinkoffRow>(raw) {
                Ok(row) => (ProviderRow::Tinkoff(row), None),
                Err(err) => (ProviderRow::Tinkoff(TinkoffRow::default()), Some(err.to_string())),
            },
            Self::Sberbank => match serde_json::from_value::<SberbankRow>(raw) {
                Ok(row) => (ProviderRow::Sberbank(row), None),
                Err(err) => (
                    ProviderRow::Sberbank(SberbankRow::default()),
                    Some(err.to_string()),
                ),
            },
        }
    }
}

impl FromStr for Provider {
    type Err = LedgerError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        ALL_PROVIDERS
            .iter()
            .find(|provider| provider.key().eq_ignore_ascii_case(tag))
            .copied()
            .ok_or_else(|| LedgerError::UnknownProvider(tag.to_string()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A statement row tagged with the provider that produced it.
#[derive(Debug, Clone)]
pub enum ProviderRow {
    Tinkoff(TinkoffRow),
    Sberbank(SberbankRow),
}

/// A recovered problem with one source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub row: usize,
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: `{}` {}", self.row + 1, self.field, self.reason)
    }
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub mapping: CategoryMapping,
    /// Bucket for rows whose category cell is missing or blank.
    pub default_category: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            mapping: CategoryMapping::default(),
            default_category: UNCATEGORIZED.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub transaction: Transaction,
    pub issues: Vec<MalformedRow>,
}

/// Outcome of ingesting one batch of rows.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub provider: Provider,
    pub transactions: Vec<Transaction>,
    pub issues: Vec<MalformedRow>,
}

pub(crate) struct RowContext<'a> {
    row: usize,
    options: &'a NormalizeOptions,
    issues: Vec<MalformedRow>,
}

impl<'a> RowContext<'a> {
    fn new(row: usize, options: &'a NormalizeOptions) -> Self {
        Self {
            row,
            options,
            issues: Vec::new(),
        }
    }

    pub(crate) fn note_reason(&mut self, field: &'static str, reason: impl Into<String>) {
        self.issues.push(MalformedRow {
            row: self.row,
            field,
            reason: reason.into(),
        });
    }

    fn note(&mut self, field: &'static str, issue: &CellIssue) {
        self.note_reason(field, issue.describe());
    }

    /// First usable date among `candidates`, most specific first.
    pub(crate) fn date(&mut self, candidates: &[(&'static str, Option<&Value>)]) -> StatementDate {
        let mut any_present = false;
        for &(field, cell) in candidates {
            match coerce::date(cell) {
                Ok(date) => return date,
                Err(CellIssue::Missing) => {}
                Err(issue) => {
                    any_present = true;
                    self.note(field, &issue);
                }
            }
        }
        if !any_present {
            if let Some(&(field, _)) = candidates.first() {
                self.note(field, &CellIssue::Missing);
            }
        }
        StatementDate::Unknown
    }

    pub(crate) fn amount(&mut self, field: &'static str, cell: Option<&Value>) -> f64 {
        coerce::amount(cell).unwrap_or_else(|issue| {
            self.note(field, &issue);
            0.0
        })
    }

    pub(crate) fn cashback(&mut self, candidates: &[(&'static str, Option<&Value>)]) -> f64 {
        for &(field, cell) in candidates {
            match coerce::amount(cell) {
                Ok(value) if value < 0.0 => {
                    self.note_reason(field, format!("negative cashback {value} clamped to 0"));
                    return 0.0;
                }
                Ok(value) => return value,
                Err(CellIssue::Missing) => {}
                Err(issue) => self.note(field, &issue),
            }
        }
        0.0
    }

    pub(crate) fn category(&mut self, cell: Option<&Value>) -> (String, Option<String>) {
        let label = coerce::text(cell).unwrap_or_else(|| self.options.default_category.clone());
        self.options.mapping.apply(label)
    }

    fn finish(self, transaction: Transaction) -> Normalized {
        Normalized {
            transaction,
            issues: self.issues,
        }
    }
}

/// Normalizes one row. `index` is the row's position in its batch, used for reporting.
pub fn normalize(index: usize, row: &ProviderRow, options: &NormalizeOptions) -> Normalized {
    let mut ctx = RowContext::new(index, options);
    let transaction = match row {
        ProviderRow::Tinkoff(row) => tinkoff::normalize(row, &mut ctx),
        ProviderRow::Sberbank(row) => sberbank::normalize(row, &mut ctx),
    };
    ctx.finish(transaction)
}

/// Normalizes a batch of raw row objects for a known provider.
pub fn ingest_rows(
    provider: Provider,
    rows: Vec<Value>,
    options: &NormalizeOptions,
) -> IngestReport {
    let mut transactions = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();

    for (index, raw) in rows.into_iter().enumerate() {
        let (row, decode_error) = provider.decode(raw);
        if let Some(reason) = decode_error {
            issues.push(MalformedRow {
                row: index,
                field: "row",
                reason: format!("not a {} row ({reason})", provider.name()),
            });
        }
        let normalized = normalize(index, &row, options);
        transactions.push(normalized.transaction);
        issues.extend(normalized.issues);
    }

    for issue in &issues {
        warn!(provider = provider.key(), "recovered malformed row: {issue}");
    }
    info!(
        provider = provider.key(),
        rows = transactions.len(),
        issues = issues.len(),
        "normalized statement rows"
    );

    IngestReport {
        provider,
        transactions,
        issues,
    }
}

/// Resolves `provider_tag` and normalizes `rows`; unknown tags are rejected up front.
pub fn ingest(
    provider_tag: &str,
    rows: Vec<Value>,
    options: &NormalizeOptions,
) -> Result<IngestReport, LedgerError> {
    let provider: Provider = provider_tag.parse()?;
    debug!(provider = provider.key(), rows = rows.len(), "ingesting rows");
    Ok(ingest_rows(provider, rows, options))
}
