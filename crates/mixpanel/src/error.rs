//! Error types for the Mixpanel client.

/// Errors that can occur when using the Mixpanel client.
///
/// `MissingToken`, `MissingApiKey` and `InvalidTime` are returned
/// synchronously, before anything is sent. The remaining variants are
/// delivered through the [`Delivery`](crate::Delivery) of a dispatched request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client was created without a project token.
    #[error("The Mixpanel client needs a Mixpanel token")]
    MissingToken,

    /// An event with a caller supplied time was sent without an API key.
    #[error("The Mixpanel client needs an api key when importing old events")]
    MissingApiKey,

    /// A `time` property could not be read as a timestamp.
    #[error("Invalid event time: {0}")]
    InvalidTime(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than `1`.
    #[error("Mixpanel Server Error: {0}")]
    Server(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The dispatch task did not run to completion.
    #[error("Dispatch task failed: {0}")]
    Dispatch(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether this error was raised before any request was issued.
    pub fn is_synchronous(&self) -> bool {
        matches!(
            self,
            Error::MissingToken | Error::MissingApiKey | Error::InvalidTime(_)
        )
    }
}
