//! Client configuration.
//!
//! A [`Config`] is built once, shared behind an `Arc` by every clone of a
//! [`Client`](crate::Client), and never mutated afterwards. Two clients with
//! different credentials can therefore coexist in the same process.

use crate::{Error, Result};
use http::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use std::fmt;
use url::Url;

/// The production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com/v2";

/// The `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("ocean-client/", env!("CARGO_PKG_VERSION"));

/// The `Accept` header sent with every request.
pub const ACCEPT_HEADER: &str = "application/json, text/plain, */*";

/// Connection settings shared by every request a client makes.
#[derive(Clone)]
pub struct Config {
    base_url: Url,
    token: String,
    user_agent: String,
}

impl Config {
    /// Creates a configuration for the given endpoint and bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the token is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocean_client::Config;
    ///
    /// let config = Config::new("https://api.digitalocean.com/v2", "my-token").unwrap();
    /// assert_eq!(
    ///     config.endpoint("/droplets?page=2").unwrap().as_str(),
    ///     "https://api.digitalocean.com/v2/droplets?page=2"
    /// );
    /// ```
    pub fn new(base_url: impl AsRef<str>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::ConfigurationError(
                "Bearer token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: Url::parse(base_url.as_ref())?,
            token,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Overrides the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolves a request path against the base URL.
    ///
    /// The path is appended verbatim, so any base path (such as `/v2`) and any
    /// query string on `path` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Builds the headers attached to every request.
    pub(crate) fn default_headers(&self) -> Result<HeaderMap> {
        let mut authorization = HeaderValue::try_from(format!("Bearer {}", self.token))
            .map_err(|e| Error::ConfigurationError(format!("Invalid bearer token: {}", e)))?;
        authorization.set_sensitive(true);

        let user_agent = HeaderValue::try_from(self.user_agent.as_str())
            .map_err(|e| Error::ConfigurationError(format!("Invalid user agent: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, user_agent);
        Ok(headers)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path_and_query() {
        let config = Config::new("https://api.digitalocean.com/v2/", "t").unwrap();
        assert_eq!(
            config.endpoint("/actions?page=1&per_page=25").unwrap().as_str(),
            "https://api.digitalocean.com/v2/actions?page=1&per_page=25"
        );

        let config = Config::new("http://127.0.0.1:8080", "t").unwrap();
        assert_eq!(
            config.endpoint("/volumes/abc/actions").unwrap().as_str(),
            "http://127.0.0.1:8080/volumes/abc/actions"
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = Config::new(DEFAULT_BASE_URL, "  ");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Config::new("not a url", "t");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_default_headers() {
        let config = Config::new(DEFAULT_BASE_URL, "secret").unwrap();
        let headers = config.default_headers().unwrap();

        assert_eq!(headers.get(ACCEPT).unwrap(), ACCEPT_HEADER);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
        assert!(headers.get(http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let config = Config::new(DEFAULT_BASE_URL, "bad\ntoken").unwrap();
        assert!(matches!(
            config.default_headers(),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new(DEFAULT_BASE_URL, "secret")
            .unwrap()
            .with_user_agent("doctl-lite/0.3");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("doctl-lite/0.3"));
    }
}
