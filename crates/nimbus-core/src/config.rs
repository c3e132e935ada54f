//! Declarative client configuration.
//!
//! [`NimbusConfig`] is the serde-loadable counterpart of
//! [`ClientBuilder`](crate::client::ClientBuilder): deployments that read
//! settings from a file or environment deserialize into this structure,
//! validate it, and convert it into a builder.

use crate::client::{ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Configuration for a Nimbus client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NimbusConfig {
    /// API key used to authenticate every request.
    pub api_key: String,

    /// Base URL of the API.
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; covers pacing and the network round trip.
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between consecutive requests, in milliseconds.
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_rate_interval_ms")]
    pub rate_interval_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_rate_interval_ms() -> u64 {
    200
}

impl NimbusConfig {
    /// Create a configuration with the required API key and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            rate_interval_ms: default_rate_interval_ms(),
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the user-agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the pacing interval in milliseconds.
    #[must_use]
    pub const fn with_rate_interval(mut self, millis: u64) -> Self {
        self.rate_interval_ms = millis;
        self
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pacing interval as a [`Duration`].
    #[must_use]
    pub const fn rate_interval(&self) -> Duration {
        Duration::from_millis(self.rate_interval_ms)
    }

    /// Validate the configuration and convert it into a [`ClientBuilder`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when validation fails or the base URL
    /// cannot be parsed.
    pub fn into_builder(self) -> Result<ClientBuilder, Error> {
        self.validate()
            .map_err(|err| Error::Config(format!("Invalid configuration: {err}")))?;

        let timeout = self.timeout();
        let rate_interval = self.rate_interval();
        Ok(ClientBuilder::new(self.api_key)
            .with_base_url(&self.base_url)?
            .with_user_agent(self.user_agent)
            .with_timeout(timeout)
            .with_rate_interval(rate_interval))
    }
}
