use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SharedError};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Timezone-naive calendar day, always derived on the UTC calendar.
///
/// Serializes as `"YYYY-MM-DD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.date_naive())
    }

    pub fn today() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is after `self`).
    pub fn days_since(&self, earlier: CalendarDay) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    pub fn checked_sub_months(&self, months: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(months)).map(Self)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self> {
        parse_text(s)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawDate::deserialize(deserializer)?;
        normalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// A date as it arrives from a platform API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Unix epoch in seconds.
    EpochSeconds(i64),
    /// ISO-8601 date or date-time, or epoch seconds rendered as text.
    Text(String),
}

impl From<i64> for RawDate {
    fn from(seconds: i64) -> Self {
        RawDate::EpochSeconds(seconds)
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

/// Canonicalizes a raw platform date to its UTC calendar day.
pub fn normalize(raw: &RawDate) -> Result<CalendarDay> {
    match raw {
        RawDate::EpochSeconds(seconds) => from_epoch_seconds(*seconds),
        RawDate::Text(text) => parse_text(text),
    }
}

pub fn from_epoch_seconds(seconds: i64) -> Result<CalendarDay> {
    DateTime::from_timestamp(seconds, 0)
        .map(CalendarDay::from_datetime)
        .ok_or_else(|| SharedError::format(format!("epoch seconds out of range: {}", seconds)))
}

/// Midnight UTC of `day`, in epoch seconds.
pub fn to_epoch_seconds(day: CalendarDay) -> i64 {
    let midnight = NaiveDateTime::new(day.0, NaiveTime::default());
    Utc.from_utc_datetime(&midnight).timestamp()
}

fn parse_text(text: &str) -> Result<CalendarDay> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SharedError::format("empty date"));
    }

    if is_integer(trimmed) {
        let seconds = trimmed
            .parse::<i64>()
            .map_err(|e| SharedError::format(format!("invalid epoch seconds '{}': {}", trimmed, e)))?;
        return from_epoch_seconds(seconds);
    }

    // Offset-bearing timestamps land on the UTC day, like an ISO round-trip.
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(CalendarDay::from_datetime(datetime.with_timezone(&Utc)));
    }

    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, DAY_FORMAT)
        .map(CalendarDay)
        .map_err(|_| SharedError::format(format!("unrecognized date '{}'", trimmed)))
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
