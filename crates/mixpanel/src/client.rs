//! Mixpanel client implementation.

use crate::builders::{self, AddProperties, SetProperties, TrackBuilder};
use crate::config::{Config, ConfigUpdate, MixpanelBuilder};
use crate::delivery::Delivery;
use crate::time::When;
use crate::transport::HttpTransport;
use crate::types::Outbound;
use crate::Error;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Mixpanel client.
///
/// Every operation issues exactly one request. Errors that can be detected
/// before sending are returned straight away; the rest arrive through the
/// returned [`Delivery`]. Deliveries may complete in any order.
///
/// # Example
///
/// ```rust,no_run
/// use mixpanel::Mixpanel;
///
/// #[tokio::main]
/// async fn main() -> Result<(), mixpanel::Error> {
///     let client = Mixpanel::builder("project_token").build()?;
///
///     client.track("signup")
///         .property("plan", "pro")
///         .send()?
///         .await?;
///
///     client.people().set("bob", ("plan", "premium"))?.await?;
///     client.people().increment("bob", "logins")?.await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Mixpanel {
    config: Config,
    transport: HttpTransport,
}

impl Mixpanel {
    /// Create a new builder with the given project token.
    pub fn builder(token: impl Into<String>) -> MixpanelBuilder {
        MixpanelBuilder::new(token)
    }

    /// Create a client with the default configuration.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        Self::builder(token).build()
    }

    pub(crate) fn from_config(config: Config) -> Result<Self, Error> {
        let transport = HttpTransport::new()?;
        Ok(Self { config, transport })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merge `update` into the configuration.
    ///
    /// Requests already dispatched are unaffected.
    pub fn set_config(&mut self, update: ConfigUpdate) {
        self.config.merge(update);
    }

    // ============================================
    // TRACK
    // ============================================

    /// Track an event.
    ///
    /// Events with a caller supplied time, either through
    /// [`SendableTrack::time`] or a `time` property, go to the import
    /// endpoint and need an API key.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use mixpanel::Mixpanel;
    /// # async fn example(client: &Mixpanel) -> Result<(), mixpanel::Error> {
    /// client.track("feature_used")
    ///     .property("distinct_id", "bob")
    ///     .property("feature", "export")
    ///     .send()?
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn track(&self, event: impl Into<String>) -> SendableTrack<'_> {
        SendableTrack {
            builder: TrackBuilder::new(event),
            client: self,
        }
    }

    // ============================================
    // PEOPLE
    // ============================================

    /// Profile update methods.
    pub fn people(&self) -> People<'_> {
        People { client: self }
    }

    // ============================================
    // INTERNAL
    // ============================================

    #[instrument(skip(self, outbound), fields(endpoint = outbound.endpoint.path()))]
    fn dispatch(&self, outbound: Outbound) -> Result<Delivery, Error> {
        debug!("dispatching");
        self.transport.dispatch(&self.config, &outbound)
    }
}

impl MixpanelBuilder {
    /// Build the Mixpanel client.
    ///
    /// Fails if the token is empty.
    pub fn build(self) -> Result<Mixpanel, Error> {
        let config = self.build_config()?;
        Mixpanel::from_config(config)
    }
}

// ============================================
// SENDABLE WRAPPERS
// ============================================

/// Sendable track event builder.
pub struct SendableTrack<'a> {
    builder: TrackBuilder,
    client: &'a Mixpanel,
}

impl<'a> SendableTrack<'a> {
    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.builder = self.builder.property(key, value);
        self
    }

    /// Add several properties.
    pub fn properties(mut self, properties: Map<String, Value>) -> Self {
        self.builder = self.builder.properties(properties);
        self
    }

    /// Set the event time. The event is imported rather than tracked live.
    pub fn time(mut self, when: impl Into<When>) -> Self {
        self.builder = self.builder.time(when);
        self
    }

    /// Send the event.
    pub fn send(self) -> Result<Delivery, Error> {
        let outbound = self.builder.build(&self.client.config)?;
        self.client.dispatch(outbound)
    }
}

// ============================================
// NAMESPACE METHODS
// ============================================

/// Profile (engage) methods.
pub struct People<'a> {
    client: &'a Mixpanel,
}

impl<'a> People<'a> {
    /// Set one or more properties on a profile.
    ///
    /// ```rust,no_run
    /// # use mixpanel::Mixpanel;
    /// # use serde_json::json;
    /// # async fn example(client: &Mixpanel) -> Result<(), mixpanel::Error> {
    /// client.people().set("bob", ("gender", "m"))?.await?;
    ///
    /// let props = json!({"company": "acme", "plan": "premium"});
    /// client.people().set("joe", props.as_object().cloned().unwrap())?.await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set(
        &self,
        distinct_id: impl Into<String>,
        properties: impl Into<SetProperties>,
    ) -> Result<Delivery, Error> {
        let outbound = builders::profile_set(&self.client.config, distinct_id, properties.into());
        self.client.dispatch(outbound)
    }

    /// Add to one or more numeric properties on a profile.
    ///
    /// A bare property name increments by one; pass a negative amount to
    /// decrement. Non-numeric values in a bulk update are dropped.
    ///
    /// ```rust,no_run
    /// # use mixpanel::Mixpanel;
    /// # async fn example(client: &Mixpanel) -> Result<(), mixpanel::Error> {
    /// client.people().increment("bob", "page_views")?.await?;
    /// client.people().increment("bob", ("credits_left", -1))?.await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn increment(
        &self,
        distinct_id: impl Into<String>,
        properties: impl Into<AddProperties>,
    ) -> Result<Delivery, Error> {
        let outbound =
            builders::profile_increment(&self.client.config, distinct_id, properties.into());
        self.client.dispatch(outbound)
    }

    /// Delete a profile.
    pub fn delete_user(&self, distinct_id: impl Into<String>) -> Result<Delivery, Error> {
        let distinct_id = distinct_id.into();
        if self.client.config.debug() {
            info!(distinct_id = %distinct_id, "deleting user from Mixpanel");
        }
        let outbound = builders::profile_delete(&self.client.config, distinct_id);
        self.client.dispatch(outbound)
    }
}
