//! The transport layer: one long-lived HTTP client with a fixed header set.
//!
//! See [`RequestHandler`] for more information.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, IntoUrl, Response};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::tool;

/// Issues raw `GET` requests to safebooru.
///
/// The headers are fixed once the handler is built, and the inner [`Client`]
/// (and so its connection pool) is reused by every request.
/// Cloning is cheap, the clones share the same connection pool.
///
/// Redirects are followed, errors are never retried.
///
/// # Example
///
/// ```no_run
/// use safebooru::client::RequestHandler;
///
/// #[tokio::main]
/// async fn main() -> safebooru::Result<()> {
///     let handler = RequestHandler::new()?;
///     let text = handler
///         .get("https://safebooru.org/index.php?page=help&topic=dapi")
///         .await?
///         .text()
///         .await?;
///     println!("{text}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestHandler {
    client: Client,
    headers: HeaderMap,
}

impl RequestHandler {
    /// Build a handler with the default headers and no timeout.
    ///
    /// # Errors
    ///
    /// If the TLS backend cannot be initialized, this function will return an error.
    pub fn new() -> Result<Self> {
        Self::build(&Config::default())
    }

    /// Build a handler from `config`.
    ///
    /// `config.headers`, when given, replaces the default headers entirely.
    ///
    /// # Errors
    ///
    /// If a header name or value is illegal, or the inner client can not be built,
    /// this function will return an error.
    pub fn build(config: &Config) -> Result<Self> {
        let headers = match &config.headers {
            Some(headers) => Self::header_map(headers)?,
            None => Self::default_headers()?,
        };

        let client_builder = Client::builder().default_headers(headers.clone());
        let client_builder = if config.timeout > 0 {
            client_builder.timeout(Duration::from_secs(config.timeout))
        } else {
            client_builder
        };

        Ok(Self {
            client: client_builder.build()?,
            headers,
        })
    }

    /// The headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Send a `GET` request to `url`.
    ///
    /// The returned [`Response`] has already been checked for a 2xx status,
    /// use it to read the status, the final (redirected) URL, bytes, text or JSON.
    ///
    /// # Errors
    ///
    /// If the request fails, or the server answers with a non-2xx status,
    /// this function will return an error.
    pub async fn get(&self, url: impl IntoUrl) -> Result<Response> {
        let url = url.into_url()?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        log::debug!("{} <- {}", response.status(), response.url());
        Ok(response.error_for_status()?)
    }

    /// Send a `GET` request to `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn get_text(&self, url: impl IntoUrl) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }

    #[inline]
    fn default_headers() -> Result<HeaderMap> {
        Self::header_map(&HashMap::from([(
            USER_AGENT.to_string(),
            tool::USER_AGENT.clone(),
        )]))
    }

    #[inline]
    fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
        headers
            .iter()
            .map(|(key, value)| {
                let invalid = || Error::InvalidHeader(key.clone());
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| invalid())?;
                let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
                Ok::<_, Error>((name, value))
            })
            .collect()
    }
}
