//! Handle the interpretation of raw query-string values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::request::Value;
use query_engine_metadata::metadata::ValueType;

/// Date-time layouts without an offset. These are read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a raw string into a typed value, or `None` when it does not
/// read as the field's type.
pub fn parse_value(raw: &str, value_type: ValueType) -> Option<Value> {
    match value_type {
        ValueType::Number => parse_number(raw).map(Value::Number),
        ValueType::Boolean => match raw {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        ValueType::Date => parse_date(raw).map(Value::Timestamp),
        ValueType::String => Some(Value::String(raw.to_string())),
        ValueType::Uuid => Some(Value::Uuid(raw.to_string())),
    }
}

/// Integers stay integers; anything else must be a finite decimal.
fn parse_number(raw: &str) -> Option<serde_json::Number> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(integer) => Some(integer.into()),
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|date_time| date_time.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|date_time| date_time.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|date_time| date_time.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn numbers_keep_integers_exact() {
        assert_eq!(
            parse_value("42", ValueType::Number),
            Some(Value::Number(42.into()))
        );
        assert_eq!(
            parse_value(" -7 ", ValueType::Number),
            Some(Value::Number((-7).into()))
        );
    }

    #[test]
    fn numbers_accept_decimals() {
        assert_eq!(
            parse_value("19.99", ValueType::Number),
            Some(Value::Number(serde_json::Number::from_f64(19.99).unwrap()))
        );
    }

    #[test]
    fn invalid_numbers_are_dropped() {
        for raw in ["", "  ", "abc", "12abc", "NaN", "inf", "-infinity"] {
            assert_eq!(parse_value(raw, ValueType::Number), None, "{raw:?}");
        }
    }

    #[test]
    fn booleans_are_exact_literals() {
        assert_eq!(
            parse_value("true", ValueType::Boolean),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            parse_value("false", ValueType::Boolean),
            Some(Value::Boolean(false))
        );
        for raw in ["True", "1", "yes", "", " true"] {
            assert_eq!(parse_value(raw, ValueType::Boolean), None, "{raw:?}");
        }
    }

    #[test]
    fn dates_accept_rfc3339_with_offsets() {
        assert_eq!(
            parse_value("2024-03-01T12:30:00+02:00", ValueType::Date),
            Some(Value::Timestamp(utc(2024, 3, 1, 10, 30, 0)))
        );
        assert_eq!(
            parse_value("2024-03-01T12:30:00.250Z", ValueType::Date),
            Some(Value::Timestamp(
                utc(2024, 3, 1, 12, 30, 0) + chrono::Duration::milliseconds(250)
            ))
        );
    }

    #[test]
    fn dates_without_offsets_are_utc() {
        assert_eq!(
            parse_value("2024-03-01", ValueType::Date),
            Some(Value::Timestamp(utc(2024, 3, 1, 0, 0, 0)))
        );
        assert_eq!(
            parse_value("2024-03-01T08:15", ValueType::Date),
            Some(Value::Timestamp(utc(2024, 3, 1, 8, 15, 0)))
        );
        assert_eq!(
            parse_value("2024-03-01 08:15:45", ValueType::Date),
            Some(Value::Timestamp(utc(2024, 3, 1, 8, 15, 45)))
        );
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        for raw in ["", "yesterday", "2024-13-01", "2024-02-30", "01/03/2024"] {
            assert_eq!(parse_value(raw, ValueType::Date), None, "{raw:?}");
        }
    }

    #[test]
    fn strings_and_uuids_pass_through_verbatim() {
        assert_eq!(
            parse_value(" a,b ", ValueType::String),
            Some(Value::String(" a,b ".to_string()))
        );
        assert_eq!(
            parse_value("not-a-uuid", ValueType::Uuid),
            Some(Value::Uuid("not-a-uuid".to_string()))
        );
    }
}
