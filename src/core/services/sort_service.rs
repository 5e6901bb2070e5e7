use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDateTime;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::ledger::Transaction;

pub const STATUS_RECEIVED: &str = "Received";
pub const STATUS_SENT: &str = "Sent";

/// Column a bucket view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Date,
    Amount,
    Description,
    Category,
    CardOrAccount,
    Status,
    PaymentType,
}

const ALL_KEYS: &[SortKey] = &[
    SortKey::Date,
    SortKey::Amount,
    SortKey::Description,
    SortKey::Category,
    SortKey::CardOrAccount,
    SortKey::Status,
    SortKey::PaymentType,
];

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        ALL_KEYS
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
            Self::Category => "category",
            Self::CardOrAccount => "cardOrAccount",
            Self::Status => "status",
            Self::PaymentType => "paymentType",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match wanted.as_str() {
            "card" | "account" | "cardnumber" => return Ok(Self::CardOrAccount),
            "payment" | "type" => return Ok(Self::PaymentType),
            _ => {}
        }
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.key().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown sort key `{}`", value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Active ordering of a bucket view. `key: None` shows rows in bucket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Re-selecting the active key flips direction; a new key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Where the displayed status of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSource {
    #[default]
    Recorded,
    /// Transfer-like buckets show `Received`/`Sent` from the amount sign.
    DerivedFromSign,
}

enum SortValue {
    Instant(Option<NaiveDateTime>),
    Magnitude(f64),
    Text { folded: String, raw: String },
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (Self::Magnitude(a), Self::Magnitude(b)) => a.total_cmp(b),
            (
                Self::Text { folded: fa, raw: ra },
                Self::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
            _ => Ordering::Equal,
        }
    }
}

pub struct SortService;

impl SortService {
    /// Orders a bucket's transactions for display without touching the bucket.
    ///
    /// The sort is stable; descending is the exact reverse of ascending.
    pub fn sort<'a>(
        transactions: &'a [Transaction],
        spec: &SortSpec,
        status: StatusSource,
    ) -> Vec<&'a Transaction> {
        let Some(key) = spec.key else {
            return transactions.iter().collect();
        };
        let mut decorated: Vec<(SortValue, &Transaction)> = transactions
            .iter()
            .map(|txn| (Self::value(key, txn, status), txn))
            .collect();
        decorated.sort_by(|(a, _), (b, _)| a.compare(b));
        let mut rows: Vec<&Transaction> = decorated.into_iter().map(|(_, txn)| txn).collect();
        if spec.direction == SortDirection::Descending {
            rows.reverse();
        }
        rows
    }

    pub fn display_status(txn: &Transaction, source: StatusSource) -> Cow<'_, str> {
        match source {
            StatusSource::Recorded => Cow::Borrowed(txn.status.as_str()),
            StatusSource::DerivedFromSign if txn.amount > 0.0 => Cow::Borrowed(STATUS_RECEIVED),
            StatusSource::DerivedFromSign => Cow::Borrowed(STATUS_SENT),
        }
    }

    /// Accent- and case-insensitive form used to compare text columns.
    pub fn collation_key(text: &str) -> String {
        text.nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect()
    }

    fn value(key: SortKey, txn: &Transaction, status: StatusSource) -> SortValue {
        let text = |raw: &str| SortValue::Text {
            folded: Self::collation_key(raw),
            raw: raw.to_string(),
        };
        match key {
            SortKey::Date => SortValue::Instant(txn.date.instant()),
            SortKey::Amount => SortValue::Magnitude(txn.amount.abs()),
            SortKey::Description => text(&txn.description),
            SortKey::Category => text(txn.source_category()),
            SortKey::CardOrAccount => text(&txn.card_or_account),
            SortKey::Status => text(&Self::display_status(txn, status)),
            SortKey::PaymentType => text(&txn.payment_type),
        }
    }
}
