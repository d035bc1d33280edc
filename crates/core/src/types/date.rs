//! Lenient date handling for backend payloads
//!
//! Rental dates come back either as `2024-01-10` or as a full timestamp
//! (`2024-01-10T09:30:00`, `2024-01-10T09:30:00Z`). Only the calendar date
//! matters for rentals, so the time part is dropped.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar date at the start of `value`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

pub fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct DateLenient;

    impl<'de> de::Visitor<'de> for DateLenient {
        type Value = NaiveDate;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a date string starting with YYYY-MM-DD")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<NaiveDate, E> {
            parse_date(v).ok_or_else(|| E::custom(format!("invalid date: {}", v)))
        }
    }

    deserializer.deserialize_str(DateLenient)
}

/// Optional variant of [`deserialize_date`]; null or unparseable becomes `None`
pub fn deserialize_opt_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            parse_date("2024-01-10"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
    }

    #[test]
    fn test_parse_drops_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_date("2024-01-10T23:59:59"), expected);
        assert_eq!(parse_date("2024-01-10T00:00:01.000Z"), expected);
    }

    #[test]
    fn test_optional_date() {
        #[derive(Deserialize)]
        struct Returned {
            #[serde(default, deserialize_with = "deserialize_opt_date")]
            on: Option<NaiveDate>,
        }
        let r: Returned = serde_json::from_str(r#"{"on":"2024-01-12T10:00:00"}"#).unwrap();
        assert_eq!(r.on, NaiveDate::from_ymd_opt(2024, 1, 12));
        let r: Returned = serde_json::from_str(r#"{"on":null}"#).unwrap();
        assert_eq!(r.on, None);
        let r: Returned = serde_json::from_str("{}").unwrap();
        assert_eq!(r.on, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("10/01/2024"), None);
        assert_eq!(parse_date(""), None);
    }
}
