use crate::errors::{HabitError, HabitResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of "now" for elapsed-day derivation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A habit's reference date. Keeps the text it was built from so it goes
/// back over the wire unchanged. Server-supplied text that does not parse
/// is kept with no instant; locally built dates must parse.
#[derive(Debug, Clone)]
pub struct ReferenceDate {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl ReferenceDate {
    pub fn lenient(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// `None` when the date text was not recognized.
    pub fn days_elapsed(&self, now: DateTime<Utc>) -> Option<i64> {
        self.instant.map(|instant| days_elapsed_at(instant, now))
    }
}

impl PartialEq for ReferenceDate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ReferenceDate {}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ReferenceDate {
    type Err = HabitError;

    fn from_str(raw: &str) -> HabitResult<Self> {
        let date = Self::lenient(raw);
        if date.instant.is_none() {
            return Err(HabitError::invalid(format!("unrecognized date `{raw}`")));
        }
        Ok(date)
    }
}

impl Serialize for ReferenceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ReferenceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::lenient(String::deserialize(deserializer)?))
    }
}

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only values land on UTC midnight; naive date-times are read as UTC,
/// so a trailing `Z` changes nothing.
fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    let value = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days from `reference` to `now`, floored. A reference in the future
/// yields a negative count; nothing is clamped.
pub fn days_elapsed_at(reference: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - reference).num_milliseconds().div_euclid(MS_PER_DAY)
}
