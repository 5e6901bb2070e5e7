use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const DAY_FORMAT: &str = "%d.%m.%Y";
const MOMENT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const SECONDS_PER_DAY: i64 = 86_400;

/// Spreadsheet serial of 31.12.9999, the last day a serial cell may name.
pub const MAX_SERIAL: f64 = 2_958_465.0;

/// Date carried by a statement row, with or without a time of day.
///
/// Serialized as `DD.MM.YYYY`, `DD.MM.YYYY HH:MM:SS`, or an empty string when the
/// source row had no usable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatementDate {
    #[default]
    Unknown,
    Day(NaiveDate),
    Moment(NaiveDateTime),
}

impl StatementDate {
    /// Parses the textual date forms found in bank exports.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        for format in [MOMENT_FORMAT, "%d.%m.%Y %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(moment) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Self::Moment(moment));
            }
        }
        for format in [DAY_FORMAT, "%Y-%m-%d"] {
            if let Ok(day) = NaiveDate::parse_from_str(raw, format) {
                return Some(Self::Day(day));
            }
        }
        None
    }

    /// Converts a spreadsheet serial day number (1899-12-30 epoch) into a date.
    ///
    /// Serials run from 1.0 to [`MAX_SERIAL`] (31.12.9999). The time of day is
    /// rounded to the second; a fraction that rounds up to midnight lands on the next day.
    pub fn from_serial(serial: f64) -> Option<Self> {
        if !serial.is_finite() || !(1.0..MAX_SERIAL + 1.0).contains(&serial) {
            return None;
        }
        let total_seconds = (serial * SECONDS_PER_DAY as f64).round() as i64;
        let days = u64::try_from(total_seconds.div_euclid(SECONDS_PER_DAY)).ok()?;
        let seconds = u32::try_from(total_seconds.rem_euclid(SECONDS_PER_DAY)).ok()?;
        let day = NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))?;
        if seconds == 0 {
            return Some(Self::Day(day));
        }
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?;
        Some(Self::Moment(day.and_time(time)))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Comparable instant; a bare day counts as midnight.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Unknown => None,
            Self::Day(day) => day.and_hms_opt(0, 0, 0),
            Self::Moment(moment) => Some(*moment),
        }
    }
}

impl fmt::Display for StatementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => Ok(()),
            Self::Day(day) => write!(f, "{}", day.format(DAY_FORMAT)),
            Self::Moment(moment) => write!(f, "{}", moment.format(MOMENT_FORMAT)),
        }
    }
}

impl Serialize for StatementDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatementDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(Self::Unknown);
        }
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }
}
