//! Custom GraphQL scalars.
//!
//! `Date` is a calendar date written as `YYYY-MM-DD`; `Timestamp` is an
//! instant carried as epoch milliseconds. Neither codec ever fails: input
//! that does not fit the format becomes `null`.

use async_graphql::{InputValueResult, Scalar, ScalarType, Value};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a `YYYY-MM-DD` string that names a real calendar date.
///
/// Returns the parsed date, or `None` for a malformed pattern (`15-06-2023`)
/// or an impossible date (`2023-02-30`).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// Convert epoch milliseconds into a UTC instant.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Convert a UTC instant into epoch milliseconds.
pub fn datetime_to_millis(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// The `Date` scalar. `None` means the input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarDate(pub Option<NaiveDate>);

impl CalendarDate {
    pub fn from_str_lossy(input: &str) -> Self {
        Self(parse_date(input))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
    }
}

#[Scalar(name = "Date")]
impl ScalarType for CalendarDate {
    fn parse(value: Value) -> InputValueResult<Self> {
        Ok(match value {
            Value::String(s) => Self::from_str_lossy(&s),
            _ => Self(None),
        })
    }

    fn to_value(&self) -> Value {
        match self.0 {
            Some(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            None => Value::Null,
        }
    }
}

/// The `Timestamp` scalar. `None` means the input was not an integer or fell
/// outside the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp(pub Option<DateTime<Utc>>);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis_to_datetime(millis))
    }

    pub fn millis(&self) -> Option<i64> {
        self.0.as_ref().map(datetime_to_millis)
    }
}

#[Scalar(name = "Timestamp")]
impl ScalarType for Timestamp {
    fn parse(value: Value) -> InputValueResult<Self> {
        Ok(match value {
            Value::Number(n) => n.as_i64().map(Self::from_millis).unwrap_or_default(),
            _ => Self(None),
        })
    }

    fn to_value(&self) -> Value {
        match self.millis() {
            Some(millis) => Value::Number(millis.into()),
            None => Value::Null,
        }
    }
}

// Stash sends epoch milliseconds as plain JSON integers.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<i64>::deserialize(deserializer)?;
        Ok(millis.map(Self::from_millis).unwrap_or_default())
    }
}
