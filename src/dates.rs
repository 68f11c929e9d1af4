use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

use crate::error::AppError;

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
pub const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Wall-clock time of day as "HH:MM", the format meal rows carry.
pub fn now_hhmm() -> String {
    OffsetDateTime::now_utc()
        .time()
        .format(TIME_FORMAT)
        .unwrap_or_else(|_| "00:00".into())
}

pub fn parse_date(s: &str) -> Result<Date, AppError> {
    Date::parse(s, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

/// Serde adapter keeping calendar dates as "YYYY-MM-DD" in JSON bodies.
pub mod serde_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date.format(DATE_FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, DATE_FORMAT).map_err(D::Error::custom)
    }
}
