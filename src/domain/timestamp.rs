//! Naive local timestamps as they are persisted.
//!
//! Stored values use a fixed-width, lexically sortable layout so that
//! window filters can compare them as text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::DomainError;

/// Layout used for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Render a timestamp for storage.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// # Errors
/// Returns [`DomainError::InvalidTimestamp`] when the text does not match
/// [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        DomainError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Midnight at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Half-open `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Window spanning whole days `[first, until)`.
    #[must_use]
    pub fn days(first: NaiveDate, until: NaiveDate) -> Self {
        Self {
            start: start_of_day(first),
            end: start_of_day(until),
        }
    }

    /// True when `ts` falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        *ts >= self.start && *ts < self.end
    }
}

/// Serde adapter writing timestamps in [`TIMESTAMP_FORMAT`].
///
/// Use with `#[serde(with = "crate::domain::timestamp::text")]`.
pub mod text {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }

    /// Same layout for optional timestamps; `null` means absent.
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_some(&super::super::format_timestamp(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::super::parse_timestamp(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
