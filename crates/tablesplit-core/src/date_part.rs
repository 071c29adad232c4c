// Calendar parts used by date-based splitting strategies
//
// Each part maps a UTC datetime to a single integer (year=2024, month=1..12,
// ISO week=1..53, day=1..31, hour=0..23, minute=0..59).

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::SplitError;

/// A calendar component extractable from a datetime column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
}

impl DatePart {
    /// All supported parts, in coarse-to-fine order.
    pub const ALL: [DatePart; 6] = [
        DatePart::Year,
        DatePart::Month,
        DatePart::Week,
        DatePart::Day,
        DatePart::Hour,
        DatePart::Minute,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Week => "week",
            DatePart::Day => "day",
            DatePart::Hour => "hour",
            DatePart::Minute => "minute",
        }
    }

    /// Extract this part from a UTC datetime.
    ///
    /// Week follows the ISO 8601 week numbering, matching what most
    /// warehouses return for `EXTRACT(WEEK FROM ...)`.
    pub fn extract(&self, dt: &DateTime<Utc>) -> i64 {
        match self {
            DatePart::Year => i64::from(dt.year()),
            DatePart::Month => i64::from(dt.month()),
            DatePart::Week => i64::from(dt.iso_week().week()),
            DatePart::Day => i64::from(dt.day()),
            DatePart::Hour => i64::from(dt.hour()),
            DatePart::Minute => i64::from(dt.minute()),
        }
    }
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePart {
    type Err = SplitError;

    /// Case-insensitive lookup by canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DatePart::ALL
            .iter()
            .copied()
            .find(|part| part.as_str() == lowered)
            .ok_or_else(|| SplitError::UnknownDatePart {
                name: s.to_string(),
                supported: supported_names(),
            })
    }
}

impl Serialize for DatePart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DatePart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

fn supported_names() -> String {
    DatePart::ALL
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Datetime layouts accepted for string-typed batch identifiers.
///
/// Tried in order after RFC 3339; the first match wins. A bare date parses
/// to midnight UTC.
const FALLBACK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
];

/// Parse a datetime string into a UTC instant.
///
/// Returns `None` when no accepted layout matches; callers decide whether
/// that is an error (identifier values) or a non-match (cell values).
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in FALLBACK_FORMATS {
        if format == "%Y-%m-%d" {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
        } else if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Parse a strftime format string into chrono items, rejecting bad
/// specifiers.
///
/// chrono only reports bad specifiers lazily, at format time, so walk the
/// parsed items up front and reject any `Item::Error`.
pub(crate) fn strftime_items(format: &str) -> Result<Vec<Item<'_>>, SplitError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(SplitError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(items)
}

/// Validate a strftime format string without formatting anything.
pub fn validate_date_format(format: &str) -> Result<(), SplitError> {
    strftime_items(format).map(|_| ())
}
