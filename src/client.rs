//! The HTTP transport.
//!
//! The [`Client`] type is the single chokepoint for network calls: every
//! request goes through [`Client::call`], which attaches the shared headers,
//! sends the pre-serialized body, decodes the response once, and classifies
//! the result by status code. Use [`ClientBuilder`] to configure and create clients.

use crate::{
    action::Actions,
    config::{Config, DEFAULT_BASE_URL},
    response::{decode_body, StatusClass},
    Error, Request, Response, Result,
};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// An HTTP client for the API.
///
/// The client is cheap to clone and designed to be reused; every clone shares
/// the same read-only [`Config`]. Calls are independent of each other and can
/// run concurrently.
///
/// # Examples
///
/// ```no_run
/// use ocean_client::Client;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), ocean_client::Error> {
/// let client = Client::new("my-token")?;
///
/// // GET request
/// let account = client.get("/account").await?;
/// println!("Account: {:?}", account.data);
///
/// // POST request
/// let tag = client.post("/tags", &json!({"name": "web"})).await?;
/// println!("Created tag with status {}", tag.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: Config,
    default_headers: HeaderMap,
}

impl Client {
    /// Creates a client for the production API with the given bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or not a valid header value.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder().token(token).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ocean_client::Client;
    ///
    /// # async fn example() -> Result<(), ocean_client::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.digitalocean.com/v2")?
    ///     .token("my-token")
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from an existing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or user agent are not valid header values,
    /// or if the HTTP client cannot be initialized.
    pub fn with_config(config: Config) -> Result<Self> {
        let default_headers = config.default_headers()?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                default_headers,
            }),
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the action endpoints.
    pub fn actions(&self) -> Actions<'_> {
        Actions::new(self)
    }

    /// Sends a request and classifies the response.
    ///
    /// Statuses above 500 yield [`Error::ServerError`], statuses in `(400, 500]`
    /// yield [`Error::ClientError`], everything else resolves. A body that is not
    /// valid JSON is not an error: the response comes back with `data = None`
    /// and the payload in `text`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use http::Method;
    /// use ocean_client::{Client, Request};
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), ocean_client::Error> {
    /// let client = Client::new("my-token")?;
    ///
    /// let request = Request::new(Method::DELETE, "/tags/web/resources")?
    ///     .with_json(&json!({"resources": [{"resource_id": "9569411", "resource_type": "droplet"}]}))?;
    ///
    /// let response = client.call(request).await?;
    /// assert!(response.data.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, request: Request) -> Result<Response> {
        let start_time = Instant::now();

        let response = self.execute_request(&request).await?;
        self.parse_response(&request, response, start_time).await
    }

    /// Sends a single request.
    async fn execute_request(&self, request: &Request) -> Result<reqwest::Response> {
        let url = self.inner.config.endpoint(request.path())?;

        tracing::debug!(
            method = %request.method(),
            url = %url,
            "Executing HTTP request"
        );

        let mut builder = self
            .inner
            .http_client
            .request(request.method().clone(), url)
            .headers(self.inner.default_headers.clone());

        if request.sends_json() {
            builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(body) = request.body() {
            builder = builder.body(body.to_owned());
        }

        let response = builder.send().await?;

        Ok(response)
    }

    /// Reads and decodes the response, then classifies it by status.
    async fn parse_response(
        &self,
        request: &Request,
        response: reqwest::Response,
        start_time: Instant,
    ) -> Result<Response> {
        let status = response.status();
        let headers = response.headers().clone();

        let body = response.text().await?;
        let latency = start_time.elapsed();

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        let text = if body.is_empty() { None } else { Some(body) };
        let data = text.as_deref().and_then(decode_body);

        if text.is_some() && data.is_none() {
            tracing::debug!(
                status = status.as_u16(),
                path = %request.path(),
                "Response body is not JSON; keeping raw text only"
            );
        }

        let response = Response::new(status, headers, text, data, latency);

        match StatusClass::of(status) {
            StatusClass::Success => Ok(response),
            StatusClass::ClientError => {
                tracing::debug!(
                    status = status.as_u16(),
                    method = %request.method(),
                    path = %request.path(),
                    "Client error"
                );
                Err(Error::ClientError(Box::new(response)))
            }
            StatusClass::ServerError => {
                tracing::warn!(
                    status = status.as_u16(),
                    method = %request.method(),
                    path = %request.path(),
                    "Server error"
                );
                Err(Error::ServerError(Box::new(response)))
            }
        }
    }

    /// Makes a HEAD request to the specified path.
    pub async fn head(&self, path: impl Into<String>) -> Result<Response> {
        self.call(Request::new(Method::HEAD, path)?).await
    }

    /// Makes a GET request to the specified path.
    ///
    /// The path may include a query string.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ocean_client::Client;
    ///
    /// # async fn example() -> Result<(), ocean_client::Error> {
    /// let client = Client::new("my-token")?;
    ///
    /// let response = client.get("/droplets?tag_name=web&page=1&per_page=25").await?;
    /// let droplets: Vec<serde_json::Value> = response.field("droplets")?;
    /// println!("{} droplets", droplets.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, path: impl Into<String>) -> Result<Response> {
        self.call(Request::new(Method::GET, path)?).await
    }

    /// Makes a POST request to the specified path with a JSON body.
    pub async fn post<B>(&self, path: impl Into<String>, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.call(Request::new(Method::POST, path)?.with_json(body)?)
            .await
    }

    /// Makes a PUT request to the specified path with a JSON body.
    pub async fn put<B>(&self, path: impl Into<String>, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.call(Request::new(Method::PUT, path)?.with_json(body)?)
            .await
    }

    /// Makes a PATCH request to the specified path with a JSON body.
    pub async fn patch<B>(&self, path: impl Into<String>, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.call(Request::new(Method::PATCH, path)?.with_json(body)?)
            .await
    }

    /// Makes a DELETE request to the specified path.
    pub async fn delete(&self, path: impl Into<String>) -> Result<Response> {
        self.call(Request::new(Method::DELETE, path)?).await
    }

    /// Makes a DELETE request that carries a JSON payload.
    ///
    /// The payload is sent without a `Content-Type` header.
    pub async fn delete_with_body<B>(&self, path: impl Into<String>, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        self.call(Request::new(Method::DELETE, path)?.with_json(body)?)
            .await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use ocean_client::ClientBuilder;
///
/// # async fn example() -> Result<(), ocean_client::Error> {
/// let client = ClientBuilder::new()
///     .token("my-token")
///     .user_agent("my-app/1.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    token: Option<String>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            user_agent: None,
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no token was provided or if the client
    /// configuration is invalid.
    pub fn build(self) -> Result<Client> {
        let token = self
            .token
            .ok_or_else(|| Error::ConfigurationError("Bearer token is required".to_string()))?;

        let base_url = match &self.base_url {
            Some(url) => url.as_str(),
            None => DEFAULT_BASE_URL,
        };

        let mut config = Config::new(base_url, token)?;
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        Client::with_config(config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_token() {
        let result = Client::builder().build();
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_builder_defaults_to_production() {
        let client = Client::new("token").unwrap();
        assert_eq!(
            client.config().base_url().as_str(),
            "https://api.digitalocean.com/v2"
        );
        assert_eq!(client.config().token(), "token");
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder()
            .base_url("http://localhost:9000/v2")
            .unwrap()
            .token("token")
            .user_agent("ops-bot/2.1")
            .build()
            .unwrap();

        assert_eq!(
            client.config().endpoint("/account").unwrap().as_str(),
            "http://localhost:9000/v2/account"
        );
        assert_eq!(client.config().user_agent(), "ops-bot/2.1");
    }

    #[test]
    fn test_clients_keep_separate_credentials() {
        let first = Client::new("alpha").unwrap();
        let second = Client::new("beta").unwrap();
        let shared = first.clone();

        assert_eq!(first.config().token(), "alpha");
        assert_eq!(second.config().token(), "beta");
        assert_eq!(shared.config().token(), "alpha");
    }

    #[test]
    fn test_invalid_header_token() {
        let result = Client::new("line\nbreak");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Client::builder().base_url("::nope::");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
