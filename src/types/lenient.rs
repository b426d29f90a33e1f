//! Field decoders for raw HidroWebService values.
//!
//! The service is loose about scalar types: numbers often arrive as strings
//! (`"12.5"`, `"1"`), flags as `0`/`1` and timestamps as
//! `"2020-01-01 00:00:00.0"`. These decoders accept those spellings and reject
//! anything else. The `opt_*` variants map `null` and `""` to `None`; pair them
//! with `#[serde(default)]` so a missing key is also `None`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

pub(crate) fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

pub(crate) fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => match to_i64(value)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    let s = value.as_str()?.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn to_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| to_datetime(value).map(|dt| dt.date()))
}

/// `null`, a missing value and a blank string all mean "no value".
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Decodes an optional raw value, failing only when a non-blank value cannot be converted.
pub(crate) fn convert_optional<T>(
    value: Option<&Value>,
    expected: &str,
    convert: fn(&Value) -> Option<T>,
) -> Result<Option<T>, String> {
    match value {
        None => Ok(None),
        Some(v) if is_blank(v) => Ok(None),
        Some(v) => convert(v)
            .map(Some)
            .ok_or_else(|| format!("expected {expected}, found {v}")),
    }
}

fn required<'de, D, T>(
    deserializer: D,
    expected: &str,
    convert: fn(&Value) -> Option<T>,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    convert(&value).ok_or_else(|| D::Error::custom(format!("expected {expected}, found {value}")))
}

fn optional<'de, D, T>(
    deserializer: D,
    expected: &str,
    convert: fn(&Value) -> Option<T>,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    convert_optional(value.as_ref(), expected, convert).map_err(D::Error::custom)
}

pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    required(d, "a number", to_f64)
}

pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    optional(d, "a number", to_f64)
}

pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    required(d, "an integer", to_i64)
}

pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    optional(d, "an integer", to_i64)
}

pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    required(d, "a non-negative integer", |v| {
        to_i64(v).and_then(|i| u64::try_from(i).ok())
    })
}

pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    required(d, "a 0/1 flag", to_bool)
}

pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    optional(d, "a 0/1 flag", to_bool)
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    required(d, "a string", to_string)
}

pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    optional(d, "a string", to_string)
}

pub fn datetime<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    required(d, "a timestamp", to_datetime)
}

pub fn opt_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
    optional(d, "a timestamp", to_datetime)
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    optional(d, "a date", to_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_from_strings() {
        assert_eq!(to_f64(&json!("12.5")), Some(12.5));
        assert_eq!(to_f64(&json!("12,5")), Some(12.5));
        assert_eq!(to_f64(&json!(3)), Some(3.0));
        assert_eq!(to_i64(&json!("42")), Some(42));
        assert_eq!(to_i64(&json!(42.0)), Some(42));
        assert_eq!(to_i64(&json!("4.5")), None);
        assert_eq!(to_f64(&json!("abc")), None);
    }

    #[test]
    fn test_flags() {
        assert_eq!(to_bool(&json!("1")), Some(true));
        assert_eq!(to_bool(&json!(0)), Some(false));
        assert_eq!(to_bool(&json!(true)), Some(true));
        assert_eq!(to_bool(&json!("2")), None);
    }

    #[test]
    fn test_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(to_datetime(&json!("2020-01-01 00:00:00.0")), Some(expected));
        assert_eq!(to_datetime(&json!("2020-01-01T00:00:00")), Some(expected));
        assert_eq!(to_datetime(&json!("2020-01-01")), Some(expected));
        assert_eq!(
            to_date(&json!("2020-01-01 00:00:00.0")),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(to_datetime(&json!("01/01/2020")), None);
    }

    #[test]
    fn test_blank_optional_is_none() {
        assert_eq!(convert_optional(Some(&json!("")), "a number", to_f64), Ok(None));
        assert_eq!(convert_optional(None, "a number", to_f64), Ok(None));
        assert!(convert_optional(Some(&json!("x")), "a number", to_f64).is_err());
    }
}
