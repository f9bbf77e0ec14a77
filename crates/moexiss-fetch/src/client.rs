//! HTTP client for ISS requests.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::auth::Session;
use crate::url::{Endpoints, PASSPORT_COOKIE};

/// Configuration shared by [`IssClient`] and [`crate::Authenticator`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Server locations.
    pub endpoints: Endpoints,
    /// Name of the passport cookie set by the auth endpoint.
    pub passport_cookie: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("moexiss/{}", env!("CARGO_PKG_VERSION")),
            endpoints: Endpoints::default(),
            passport_cookie: PASSPORT_COOKIE.to_string(),
        }
    }
}

/// Errors that can occur while retrieving ISS data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Reply is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A required row attribute could not be parsed.
    #[error("Invalid {field} value '{value}'")]
    InvalidField {
        /// Attribute name.
        field: &'static str,
        /// Raw attribute value.
        value: String,
    },

    /// A configured URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// ISS client.
///
/// Issues one request at a time. Built anonymously it can read the public
/// reference lists; built from a [`Session`] it sends the session's cookies,
/// which history requests require.
#[derive(Debug, Clone)]
pub struct IssClient {
    client: Client,
    config: ClientConfig,
}

impl IssClient {
    /// Creates an anonymous client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Self::builder(&config).build()?;
        Ok(Self { client, config })
    }

    /// Creates an anonymous client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Creates a client that sends the cookies of `session`.
    ///
    /// The client keeps a handle to the session's cookie store, so a later
    /// re-authentication is picked up without rebuilding the client. Cookies
    /// set by ISS replies are not written back into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_session(config: ClientConfig, session: &Session) -> Result<Self, reqwest::Error> {
        let client = Self::builder(&config)
            .cookie_provider(session.cookies())
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn builder(config: &ClientConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
    }

    /// Fetches the raw reply body for `url`.
    pub(crate) async fn get_reply(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = %url, "requesting ISS reply");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
