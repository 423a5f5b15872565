//! Payload types and serialization.

use serde::Serialize;
use serde_json::{Map, Value};

/// Service endpoint a payload is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Live event tracking.
    Track,
    /// Historical event import, requires an API key.
    Import,
    /// Profile (engage) updates.
    Engage,
}

impl Endpoint {
    /// Request path for this endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Track => "/track",
            Endpoint::Import => "/import",
            Endpoint::Engage => "/engage",
        }
    }
}

/// An event sent to `/track` or `/import`.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub event: String,
    pub properties: Map<String, Value>,
}

/// Profile mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngageOperation {
    #[serde(rename = "$set")]
    Set(Map<String, Value>),
    #[serde(rename = "$add")]
    Add(Map<String, Value>),
    #[serde(rename = "$delete")]
    Delete(String),
}

/// A profile update sent to `/engage`.
#[derive(Debug, Clone, Serialize)]
pub struct EngagePayload {
    #[serde(flatten)]
    pub operation: EngageOperation,
    #[serde(rename = "$token")]
    pub token: String,
    #[serde(rename = "$distinct_id")]
    pub distinct_id: String,
}

/// Any payload the client sends.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Event(EventPayload),
    Engage(EngagePayload),
}

/// A payload paired with the endpoint it must go to.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub endpoint: Endpoint,
    pub payload: Payload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Track.path(), "/track");
        assert_eq!(Endpoint::Import.path(), "/import");
        assert_eq!(Endpoint::Engage.path(), "/engage");
    }

    #[test]
    fn test_engage_set_shape() {
        let payload = EngagePayload {
            operation: EngageOperation::Set(Map::from_iter([("plan".into(), json!("pro"))])),
            token: "tok".into(),
            distinct_id: "bob".into(),
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({"$set": {"plan": "pro"}, "$token": "tok", "$distinct_id": "bob"})
        );
    }

    #[test]
    fn test_engage_delete_shape() {
        let payload = EngagePayload {
            operation: EngageOperation::Delete("bob".into()),
            token: "tok".into(),
            distinct_id: "bob".into(),
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["$delete"], "bob");
        assert_eq!(json["$distinct_id"], "bob");
        assert!(json.get("operation").is_none());
    }

    #[test]
    fn test_untagged_payload() {
        let payload = Payload::Event(EventPayload {
            event: "signup".into(),
            properties: Map::new(),
        });

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json, json!({"event": "signup", "properties": {}}));
    }
}
