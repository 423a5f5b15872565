//! Client configuration.

/// Default API host.
pub const DEFAULT_API_HOST: &str = "http://api.mixpanel.com";

/// Mixpanel client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) token: String,
    pub(crate) api_key: Option<String>,
    pub(crate) test: bool,
    pub(crate) debug: bool,
    pub(crate) api_host: String,
}

impl Config {
    /// Get the project token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the API key used for historical imports.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether requests are flagged as test requests.
    pub fn test(&self) -> bool {
        self.test
    }

    /// Whether outgoing payloads are logged.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Get the API host.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Overwrite the fields present in `update`, leaving the others alone.
    pub fn merge(&mut self, update: ConfigUpdate) {
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(test) = update.test {
            self.test = test;
        }
        if let Some(debug) = update.debug {
            self.debug = debug;
        }
        if let Some(api_host) = update.api_host {
            self.api_host = api_host;
        }
    }
}

/// A partial configuration. Unset fields are left untouched on merge.
///
/// The token cannot be changed after the client is created.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    api_key: Option<String>,
    test: Option<bool>,
    debug: Option<bool>,
    api_host: Option<String>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key needed to import historical events.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Flag requests as test requests.
    pub fn test(mut self, test: bool) -> Self {
        self.test = Some(test);
        self
    }

    /// Log outgoing payloads and dropped increment values.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the API host.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Take the fields set in `other`, keeping ours where it has none.
    pub fn merge(&mut self, other: ConfigUpdate) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.test.is_some() {
            self.test = other.test;
        }
        if other.debug.is_some() {
            self.debug = other.debug;
        }
        if other.api_host.is_some() {
            self.api_host = other.api_host;
        }
    }
}

/// Builder for the Mixpanel client.
#[derive(Debug)]
pub struct MixpanelBuilder {
    token: String,
    update: ConfigUpdate,
}

impl MixpanelBuilder {
    /// Create a new builder with the given project token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            update: ConfigUpdate::default(),
        }
    }

    /// Set the API key needed to import historical events.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.update = self.update.api_key(key);
        self
    }

    /// Flag requests as test requests.
    pub fn test(mut self, test: bool) -> Self {
        self.update = self.update.test(test);
        self
    }

    /// Log outgoing payloads.
    pub fn debug(mut self, debug: bool) -> Self {
        self.update = self.update.debug(debug);
        self
    }

    /// Set the API host.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.update = self.update.api_host(host);
        self
    }

    /// Apply several overrides at once, on top of those already set.
    pub fn config(mut self, update: ConfigUpdate) -> Self {
        self.update.merge(update);
        self
    }

    /// Build the configuration.
    pub(crate) fn build_config(self) -> Result<Config, crate::Error> {
        if self.token.is_empty() {
            return Err(crate::Error::MissingToken);
        }

        let mut config = Config {
            token: self.token,
            api_key: None,
            test: false,
            debug: false,
            api_host: DEFAULT_API_HOST.into(),
        };
        config.merge(self.update);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MixpanelBuilder::new("tok").build_config().unwrap();

        assert_eq!(config.token(), "tok");
        assert_eq!(config.api_key(), None);
        assert!(!config.test());
        assert!(!config.debug());
        assert_eq!(config.api_host(), DEFAULT_API_HOST);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = MixpanelBuilder::new("tok")
            .api_key("key")
            .test(true)
            .debug(true)
            .api_host("http://localhost:8080")
            .build_config()
            .unwrap();

        assert_eq!(config.api_key(), Some("key"));
        assert!(config.test());
        assert!(config.debug());
        assert_eq!(config.api_host(), "http://localhost:8080");
    }

    #[test]
    fn test_builder_empty_token_fails() {
        let result = MixpanelBuilder::new("").build_config();
        assert!(matches!(result, Err(crate::Error::MissingToken)));
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut config = MixpanelBuilder::new("tok").build_config().unwrap();

        config.merge(ConfigUpdate::new().debug(true));
        config.merge(ConfigUpdate::new().test(true));

        assert!(config.debug());
        assert!(config.test());
        assert_eq!(config.token(), "tok");
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut config = MixpanelBuilder::new("tok")
            .config(ConfigUpdate::new().api_key("first"))
            .build_config()
            .unwrap();

        config.merge(ConfigUpdate::new().api_key("second").debug(true));
        config.merge(ConfigUpdate::new().debug(false));

        assert_eq!(config.api_key(), Some("second"));
        assert!(!config.debug());
    }

    #[test]
    fn test_builder_config_keeps_earlier_setters() {
        let config = MixpanelBuilder::new("tok")
            .api_key("secret")
            .config(ConfigUpdate::new().test(true))
            .debug(true)
            .build_config()
            .unwrap();

        assert_eq!(config.api_key(), Some("secret"));
        assert!(config.test());
        assert!(config.debug());
    }

    #[test]
    fn test_update_merge_overwrites_only_set_fields() {
        let mut update = ConfigUpdate::new().api_key("first").test(true);

        update.merge(ConfigUpdate::new().api_key("second"));

        let mut config = MixpanelBuilder::new("tok").build_config().unwrap();
        config.merge(update);
        assert_eq!(config.api_key(), Some("second"));
        assert!(config.test());
        assert!(!config.debug());
    }
}
