//! Construction-time settings of a [`RequestHandler`](crate::client::RequestHandler).

use std::collections::HashMap;

use serde::Deserialize;
pub use validator::Validate;

/// The default config file, every key documented.
pub const DEFAULT_CONFIG_STR: &str = include_str!("default.toml");

/// Settings of the HTTP transport, read from a TOML file by the demo binary.
#[non_exhaustive]
#[derive(Debug, Deserialize, Clone, Default, Validate)]
pub struct Config {
    /// Replaces the default headers when given.
    #[validate(length(min = 1, message = "headers must not be empty when given"))]
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Request timeout in seconds, `0` means no timeout.
    #[validate(range(max = 600, message = "timeout must be at most 600 seconds"))]
    #[serde(default)]
    pub timeout: u64,
}

impl Config {
    /// Use `headers` instead of the default headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Give up on a request after `timeout` seconds, `0` to wait forever.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}
