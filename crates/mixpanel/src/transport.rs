//! HTTP transport for sending payloads.

use crate::config::Config;
use crate::delivery::Delivery;
use crate::types::{Endpoint, Outbound};
use crate::Error;
use base64::prelude::*;
use tracing::{debug, info, warn};

/// Body the service answers with when it accepted a payload.
const ACCEPTED: &str = "1";

/// HTTP transport for sending payloads to the Mixpanel API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Encode `outbound` and spawn the request for it.
    ///
    /// Encoding failures and a missing API key for imports are returned
    /// here, before anything is sent. Everything that happens on the wire is
    /// reported through the returned [`Delivery`]. Must be called from within
    /// a Tokio runtime.
    pub fn dispatch(&self, config: &Config, outbound: &Outbound) -> Result<Delivery, Error> {
        let query = query_params(config, outbound)?;
        let url = format!("{}{}", config.api_host(), outbound.endpoint.path());

        if config.debug() {
            info!(
                endpoint = outbound.endpoint.path(),
                payload = %serde_json::to_string(&outbound.payload)?,
                "sending payload to Mixpanel"
            );
        }

        let client = self.client.clone();
        let log_errors = config.debug();
        let handle = tokio::spawn(async move { send(client, url, query, log_errors).await });

        Ok(Delivery::new(handle))
    }
}

/// Build the query string parameters for `outbound`.
pub(crate) fn query_params(
    config: &Config,
    outbound: &Outbound,
) -> Result<Vec<(&'static str, String)>, Error> {
    let json = serde_json::to_vec(&outbound.payload)?;

    let mut query = vec![("data", BASE64_STANDARD.encode(json)), ("ip", "0".to_string())];

    if outbound.endpoint == Endpoint::Import {
        let key = config.api_key().ok_or(Error::MissingApiKey)?;
        query.push(("api_key", key.to_string()));
    }

    if config.test() {
        query.push(("test", "1".to_string()));
    }

    Ok(query)
}

async fn send(
    client: reqwest::Client,
    url: String,
    query: Vec<(&'static str, String)>,
    log_errors: bool,
) -> Result<(), Error> {
    debug!(url = %url, "sending request");

    let response = match client.get(&url).query(&query).send().await {
        Ok(response) => response,
        Err(e) => {
            if log_errors {
                info!(error = %e, "Mixpanel request failed");
            }
            return Err(e.into());
        }
    };

    let body = response.text().await?;
    classify(&body)
}

/// Interpret a response body.
pub(crate) fn classify(body: &str) -> Result<(), Error> {
    if body == ACCEPTED {
        debug!("payload accepted");
        return Ok(());
    }

    warn!(body = %body, "Mixpanel rejected payload");
    Err(Error::Server(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MixpanelBuilder;
    use crate::types::{EventPayload, Payload};
    use serde_json::{json, Map, Value};

    fn outbound(endpoint: Endpoint) -> Outbound {
        Outbound {
            endpoint,
            payload: Payload::Event(EventPayload {
                event: "signup".into(),
                properties: Map::from_iter([("token".into(), json!("tok"))]),
            }),
        }
    }

    fn decode(query: &[(&'static str, String)]) -> Value {
        let data = &query.iter().find(|(k, _)| *k == "data").unwrap().1;
        serde_json::from_slice(&BASE64_STANDARD.decode(data).unwrap()).unwrap()
    }

    #[test]
    fn test_query_params_for_track() {
        let config = MixpanelBuilder::new("tok").build_config().unwrap();

        let query = query_params(&config, &outbound(Endpoint::Track)).unwrap();

        let keys: Vec<_> = query.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["data", "ip"]);
        assert_eq!(query[1].1, "0");
        assert_eq!(
            decode(&query),
            json!({"event": "signup", "properties": {"token": "tok"}})
        );
    }

    #[test]
    fn test_query_params_test_mode() {
        let config = MixpanelBuilder::new("tok").test(true).build_config().unwrap();

        let query = query_params(&config, &outbound(Endpoint::Engage)).unwrap();

        assert!(query.contains(&("test", "1".to_string())));
    }

    #[test]
    fn test_import_requires_api_key() {
        let config = MixpanelBuilder::new("tok").build_config().unwrap();

        let result = query_params(&config, &outbound(Endpoint::Import));

        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_import_includes_api_key() {
        let config = MixpanelBuilder::new("tok")
            .api_key("secret")
            .build_config()
            .unwrap();

        let query = query_params(&config, &outbound(Endpoint::Import)).unwrap();

        assert!(query.contains(&("api_key", "secret".to_string())));
    }

    #[test]
    fn test_classify() {
        assert!(classify("1").is_ok());

        let err = classify("0").unwrap_err();
        assert!(err.to_string().contains('0'));

        let err = classify("invalid token").unwrap_err();
        assert!(matches!(err, Error::Server(ref body) if body == "invalid token"));
    }

    #[test]
    fn test_dispatch_without_api_key_fails_before_spawning() {
        let transport = HttpTransport::new().unwrap();
        let config = MixpanelBuilder::new("tok").build_config().unwrap();

        // No runtime here, so reaching tokio::spawn would panic.
        let result = transport.dispatch(&config, &outbound(Endpoint::Import));

        assert!(matches!(result, Err(Error::MissingApiKey)));
    }
}
