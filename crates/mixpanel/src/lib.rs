//! Minimal Mixpanel client for Rust.
//!
//! Sends events to `/track` (or `/import` for events with a past time) and
//! profile updates to `/engage`. Nothing is batched, queued or retried: each
//! call issues exactly one request and hands back a [`Delivery`] that resolves
//! once the service has answered.
//!
//! # Example
//!
//! ```rust,ignore
//! use mixpanel::{ConfigUpdate, Mixpanel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mixpanel::Error> {
//!     let mut client = Mixpanel::builder("project_token")
//!         .api_key("api_key")
//!         .build()?;
//!
//!     client.track("signup")
//!         .property("distinct_id", "bob")
//!         .property("plan", "pro")
//!         .send()?
//!         .await?;
//!
//!     // Historical events are imported.
//!     client.track("signup").time(1325376000).send()?.await?;
//!
//!     client.set_config(ConfigUpdate::new().test(true));
//!     client.people().delete_user("bob")?.await?;
//!     Ok(())
//! }
//! ```

mod builders;
mod client;
mod config;
mod delivery;
mod error;
mod time;
mod transport;
pub mod types;

pub use builders::{AddProperties, SetProperties, LIBRARY_TAG, LIBRARY_TAG_KEY};
pub use client::{Mixpanel, People, SendableTrack};
pub use config::{Config, ConfigUpdate, MixpanelBuilder, DEFAULT_API_HOST};
pub use delivery::Delivery;
pub use error::Error;
pub use time::{unix_time, When};
pub use types::Endpoint;
