// Date utility functions

use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Display form of a timestamp on the waitlist cards (`HH:MM`, local time).
pub fn clock_label(timestamp: DateTime<Local>) -> String {
    timestamp.format("%H:%M").to_string()
}

pub fn same_weekday(a: NaiveDate, b: NaiveDate) -> bool {
    a.weekday() == b.weekday()
}

/// Parse an ISO `YYYY-MM-DD` date, as used by the backend's `date` columns.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
///
/// Reading also accepts `HH:MM:SS`, which is how SQL `time` columns come back.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| de::Error::custom(format!("invalid time '{}'", raw)))
    }
}
