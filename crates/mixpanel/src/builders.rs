//! Payload builders for events and profile updates.

use crate::config::Config;
use crate::time::{unix_time, When};
use crate::types::{EngageOperation, EngagePayload, Endpoint, EventPayload, Outbound, Payload};
use crate::Error;
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Property key carrying the library tag.
pub const LIBRARY_TAG_KEY: &str = "mp_lib";

/// Library tag attached to every event.
pub const LIBRARY_TAG: &str = "rust";

// ============================================
// TRACK BUILDER
// ============================================

/// Builder for tracked events.
#[derive(Debug)]
pub struct TrackBuilder {
    event: String,
    properties: Map<String, Value>,
    time: Option<When>,
}

impl TrackBuilder {
    pub(crate) fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: Map::new(),
            time: None,
        }
    }

    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add several properties at once. Later keys overwrite earlier ones.
    pub fn properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Set the event time, which turns this into a historical import.
    pub fn time(mut self, when: impl Into<When>) -> Self {
        self.time = Some(when.into());
        self
    }

    /// Build the event.
    ///
    /// The endpoint is chosen from whether a time was supplied by the caller,
    /// before `time` is overwritten with its normalized value.
    pub(crate) fn build(self, config: &Config) -> Result<Outbound, Error> {
        let mut properties = self.properties;

        let supplied = match self.time {
            Some(when) => Some(when),
            None => match properties.get("time") {
                Some(value) => When::from_value(value)?,
                None => None,
            },
        };

        let endpoint = if supplied.is_some() {
            Endpoint::Import
        } else {
            Endpoint::Track
        };

        properties.insert("token".into(), config.token().into());
        properties.insert("time".into(), unix_time(supplied).into());
        properties.insert(LIBRARY_TAG_KEY.into(), LIBRARY_TAG.into());

        Ok(Outbound {
            endpoint,
            payload: Payload::Event(EventPayload {
                event: self.event,
                properties,
            }),
        })
    }
}

// ============================================
// PROFILE SET
// ============================================

/// Properties to set on a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum SetProperties {
    Single { name: String, value: Value },
    Bulk(Map<String, Value>),
}

impl SetProperties {
    fn into_map(self) -> Map<String, Value> {
        match self {
            SetProperties::Single { name, value } => Map::from_iter([(name, value)]),
            SetProperties::Bulk(entries) => entries,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for SetProperties {
    fn from((name, value): (K, V)) -> Self {
        SetProperties::Single {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<Map<String, Value>> for SetProperties {
    fn from(entries: Map<String, Value>) -> Self {
        SetProperties::Bulk(entries)
    }
}

// ============================================
// PROFILE INCREMENT
// ============================================

/// Numeric properties to add to on a profile.
///
/// A `Single` without an amount increments by one. An explicit amount of
/// zero is sent as zero, not promoted to one. Amounts and bulk values that
/// cannot be read as a number are dropped rather than failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum AddProperties {
    Single { name: String, by: Option<Value> },
    Bulk(Map<String, Value>),
}

impl AddProperties {
    /// Increment `name` by one.
    pub fn one(name: impl Into<String>) -> Self {
        AddProperties::Single {
            name: name.into(),
            by: None,
        }
    }

    fn into_map(self, debug: bool) -> Map<String, Value> {
        let entries = match self {
            AddProperties::Single { name, by: None } => {
                return Map::from_iter([(name, Value::from(1))]);
            }
            AddProperties::Single { name, by: Some(by) } => Map::from_iter([(name, by)]),
            AddProperties::Bulk(entries) => entries,
        };

        let mut add = Map::new();
        for (key, value) in entries {
            match as_number(&value) {
                Some(n) => {
                    add.insert(key, Value::Number(n));
                }
                None if debug => {
                    warn!(key = %key, value = %value, "dropping non-numeric increment value");
                }
                None => {}
            }
        }
        add
    }
}

impl From<&str> for AddProperties {
    fn from(name: &str) -> Self {
        AddProperties::one(name)
    }
}

impl From<String> for AddProperties {
    fn from(name: String) -> Self {
        AddProperties::one(name)
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for AddProperties {
    fn from((name, by): (K, V)) -> Self {
        AddProperties::Single {
            name: name.into(),
            by: Some(by.into()),
        }
    }
}

impl From<Map<String, Value>> for AddProperties {
    fn from(entries: Map<String, Value>) -> Self {
        AddProperties::Bulk(entries)
    }
}

/// Read a JSON value as a number. Numeric strings are converted.
fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i.into());
            }
            s.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

// ============================================
// ENGAGE PAYLOADS
// ============================================

fn engage(config: &Config, distinct_id: String, operation: EngageOperation) -> Outbound {
    Outbound {
        endpoint: Endpoint::Engage,
        payload: Payload::Engage(EngagePayload {
            operation,
            token: config.token().into(),
            distinct_id,
        }),
    }
}

pub(crate) fn profile_set(
    config: &Config,
    distinct_id: impl Into<String>,
    properties: SetProperties,
) -> Outbound {
    engage(
        config,
        distinct_id.into(),
        EngageOperation::Set(properties.into_map()),
    )
}

pub(crate) fn profile_increment(
    config: &Config,
    distinct_id: impl Into<String>,
    properties: AddProperties,
) -> Outbound {
    engage(
        config,
        distinct_id.into(),
        EngageOperation::Add(properties.into_map(config.debug())),
    )
}

pub(crate) fn profile_delete(config: &Config, distinct_id: impl Into<String>) -> Outbound {
    let distinct_id = distinct_id.into();
    engage(
        config,
        distinct_id.clone(),
        EngageOperation::Delete(distinct_id),
    )
}
