// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Converts the values in a [Row][crate::row::Row] into Rust types.
//!
//! Rows hold the typed JSON produced by the schema conversion: `INT64`,
//! `FLOAT64` and `BOOL` columns are JSON numbers and booleans, other scalar
//! columns keep the REST string format. The conversions here also accept
//! the raw strings, so they work on values that skipped that conversion.

use base64::Engine;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A column value cannot be converted to the requested type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: &'static str, found: Value },
    #[error("cannot parse {input:?} as {target}: {reason}")]
    Unparsable {
        target: &'static str,
        input: String,
        reason: String,
    },
    #[error("{value} is out of range for {target}")]
    OutOfRange { target: &'static str, value: String },
}

impl Error {
    fn unparsable(target: &'static str, input: &str, reason: impl std::fmt::Display) -> Self {
        Self::Unparsable {
            target,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Types that can be created from a column value.
pub trait FromSql: Sized {
    fn from_sql(value: Value) -> Result<Self, Error>;
}

/// `NULL` becomes `None`.
impl<T: FromSql> FromSql for Option<T> {
    fn from_sql(value: Value) -> Result<Self, Error> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_sql(value).map(Some)
    }
}

fn text(value: Value, expected: &'static str) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(s),
        found => Err(Error::Mismatch { expected, found }),
    }
}

fn parse<T>(target: &'static str, input: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    input
        .parse::<T>()
        .map_err(|e| Error::unparsable(target, input, e))
}

impl FromSql for i64 {
    fn from_sql(value: Value) -> Result<Self, Error> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| Error::OutOfRange {
                target: "INT64",
                value: n.to_string(),
            }),
            other => parse("INT64", &text(other, "an INT64")?),
        }
    }
}

impl FromSql for f64 {
    fn from_sql(value: Value) -> Result<Self, Error> {
        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| Error::OutOfRange {
                target: "FLOAT64",
                value: n.to_string(),
            }),
            other => parse("FLOAT64", &text(other, "a FLOAT64")?),
        }
    }
}

impl FromSql for bool {
    fn from_sql(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => parse("BOOL", &text(other, "a BOOL")?),
        }
    }
}

impl FromSql for String {
    fn from_sql(value: Value) -> Result<Self, Error> {
        text(value, "a string")
    }
}

/// `BYTES` columns are base64 encoded.
impl FromSql for Vec<u8> {
    fn from_sql(value: Value) -> Result<Self, Error> {
        let encoded = text(value, "base64 BYTES")?;
        base64::prelude::BASE64_STANDARD
            .decode(&encoded)
            .map_err(|e| Error::unparsable("BYTES", &encoded, e))
    }
}

/// `STRUCT` columns.
impl FromSql for Map<String, Value> {
    fn from_sql(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(fields) => Ok(fields),
            found => Err(Error::Mismatch {
                expected: "a STRUCT",
                found,
            }),
        }
    }
}

/// `REPEATED` columns.
impl FromSql for Vec<Value> {
    fn from_sql(value: Value) -> Result<Self, Error> {
        match value {
            Value::Array(items) => Ok(items),
            found => Err(Error::Mismatch {
                expected: "a REPEATED field",
                found,
            }),
        }
    }
}

impl FromSql for Value {
    fn from_sql(value: Value) -> Result<Self, Error> {
        Ok(value)
    }
}

/// `TIMESTAMP` columns.
///
/// Microseconds since the epoch when the query sets `useInt64Timestamp`,
/// otherwise floating point seconds such as `1.7E9`.
impl FromSql for chrono::DateTime<chrono::Utc> {
    fn from_sql(value: Value) -> Result<Self, Error> {
        let input = text(value, "a TIMESTAMP")?;
        let micros = match input.parse::<i64>() {
            Ok(micros) => micros,
            Err(_) => (parse::<f64>("TIMESTAMP", &input)? * 1e6).round() as i64,
        };
        chrono::DateTime::from_timestamp_micros(micros).ok_or(Error::OutOfRange {
            target: "TIMESTAMP",
            value: input,
        })
    }
}

impl FromSql for chrono::NaiveDate {
    fn from_sql(value: Value) -> Result<Self, Error> {
        parse("DATE", &text(value, "a DATE")?)
    }
}

impl FromSql for chrono::NaiveTime {
    fn from_sql(value: Value) -> Result<Self, Error> {
        parse("TIME", &text(value, "a TIME")?)
    }
}

impl FromSql for chrono::NaiveDateTime {
    fn from_sql(value: Value) -> Result<Self, Error> {
        parse("DATETIME", &text(value, "a DATETIME")?)
    }
}

/// A `deserialize_with` adapter for struct fields read through
/// [Row::deserialize][crate::row::Row::deserialize].
///
/// ```
/// # use cloudkit_bigquery::value;
/// #[derive(serde::Deserialize)]
/// struct Visit {
///     #[serde(deserialize_with = "value::deserialize")]
///     at: chrono::DateTime<chrono::Utc>,
/// }
/// ```
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromSql,
{
    T::from_sql(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("42"), 42)]
    #[test_case(json!(42), 42)]
    #[test_case(json!("-7"), -7)]
    fn int64(input: Value, want: i64) -> anyhow::Result<()> {
        assert_eq!(i64::from_sql(input)?, want);
        Ok(())
    }

    #[test]
    fn int64_errors() {
        let err = i64::from_sql(json!("abc")).unwrap_err();
        assert!(matches!(err, Error::Unparsable { target: "INT64", .. }), "{err:?}");
        let err = i64::from_sql(json!(1.5)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }), "{err:?}");
        let err = i64::from_sql(json!(true)).unwrap_err();
        assert!(matches!(err, Error::Mismatch { .. }), "{err:?}");
        assert!(err.to_string().contains("INT64"), "{err}");
    }

    #[test]
    fn scalars() -> anyhow::Result<()> {
        assert_eq!(f64::from_sql(json!("1.5"))?, 1.5);
        assert_eq!(f64::from_sql(json!(2.5))?, 2.5);
        assert!(bool::from_sql(json!(true))?);
        assert!(!bool::from_sql(json!("false"))?);
        assert_eq!(String::from_sql(json!("abc"))?, "abc");
        assert_eq!(Option::<String>::from_sql(Value::Null)?, None);
        assert_eq!(Option::<i64>::from_sql(json!(3))?, Some(3));
        assert_eq!(Vec::<u8>::from_sql(json!("aGVsbG8="))?, b"hello".to_vec());
        assert_eq!(Vec::<Value>::from_sql(json!([1, 2]))?.len(), 2);
        assert!(Map::from_sql(json!({"a": 1}))?.contains_key("a"));
        Ok(())
    }

    #[test]
    fn bytes_error() {
        let err = Vec::<u8>::from_sql(json!("not base64!")).unwrap_err();
        assert!(matches!(err, Error::Unparsable { target: "BYTES", .. }), "{err:?}");
    }

    #[test]
    fn timestamps() -> anyhow::Result<()> {
        let ts = chrono::DateTime::<chrono::Utc>::from_sql(json!("1700000000123456"))?;
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_micros(), 123_456);

        let ts = chrono::DateTime::<chrono::Utc>::from_sql(json!("1.7E9"))?;
        assert_eq!(ts.timestamp(), 1_700_000_000);
        Ok(())
    }

    #[test]
    fn civil_time() -> anyhow::Result<()> {
        let d = chrono::NaiveDate::from_sql(json!("2024-02-29"))?;
        assert_eq!((d.year(), d.month(), d.day()), (2024, 2, 29));
        let t = chrono::NaiveTime::from_sql(json!("12:34:56.789"))?;
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 34, 56));
        let dt = chrono::NaiveDateTime::from_sql(json!("2024-02-29T12:34:56"))?;
        assert_eq!(dt.date(), d);
        let err = chrono::NaiveDate::from_sql(json!("not a date")).unwrap_err();
        assert!(matches!(err, Error::Unparsable { target: "DATE", .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn deserialize_with() -> anyhow::Result<()> {
        #[derive(Deserialize)]
        struct Item {
            #[serde(deserialize_with = "deserialize")]
            count: i64,
            #[serde(deserialize_with = "deserialize")]
            created: chrono::DateTime<chrono::Utc>,
        }
        let item = serde_json::from_value::<Item>(json!({
            "count": "12",
            "created": "1700000000000000",
        }))?;
        assert_eq!(item.count, 12);
        assert_eq!(item.created.timestamp(), 1_700_000_000);
        Ok(())
    }
}
