//! Event time normalization.

use crate::Error;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::time::SystemTime;

/// A point in time attached to an event.
///
/// `Unix` values are taken as already being whole seconds since the epoch and
/// are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Unix(i64),
    DateTime(DateTime<Utc>),
}

impl When {
    /// Read a `time` entry from caller supplied event properties.
    ///
    /// `null` counts as absent.
    pub(crate) fn from_value(value: &Value) -> Result<Option<When>, Error> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(secs), _) => Ok(Some(When::Unix(secs))),
                (None, Some(secs)) if secs.is_finite() => Ok(Some(When::Unix(secs.floor() as i64))),
                _ => Err(Error::InvalidTime(n.to_string())),
            },
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(When::from(dt)))
                .map_err(|_| Error::InvalidTime(s.clone())),
            other => Err(Error::InvalidTime(other.to_string())),
        }
    }
}

impl From<i64> for When {
    fn from(secs: i64) -> Self {
        When::Unix(secs)
    }
}

impl From<i32> for When {
    fn from(secs: i32) -> Self {
        When::Unix(secs.into())
    }
}

impl From<u32> for When {
    fn from(secs: u32) -> Self {
        When::Unix(secs.into())
    }
}

impl From<SystemTime> for When {
    fn from(t: SystemTime) -> Self {
        When::DateTime(t.into())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for When {
    fn from(dt: DateTime<Tz>) -> Self {
        When::DateTime(dt.with_timezone(&Utc))
    }
}

/// Convert an optional point in time to whole seconds since the epoch.
///
/// Absent values use the current wall clock.
pub fn unix_time(when: Option<When>) -> i64 {
    match when {
        Some(When::Unix(secs)) => secs,
        Some(When::DateTime(dt)) => dt.timestamp_millis().div_euclid(1000),
        None => Utc::now().timestamp_millis().div_euclid(1000),
    }
}
