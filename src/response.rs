//! Response wrapper that preserves the raw body alongside the decoded JSON.
//!
//! The transport never interprets an envelope: it hands back whatever JSON the
//! endpoint returned. [`Response::field`] and [`Response::json`] are the typed
//! projection steps resource-level callers use to pull their payload out of it.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// How a status code is treated by the transport.
///
/// The bands are deliberately coarse: anything above 500 is a server failure,
/// anything in `(400, 500]` is a client failure, and everything else resolves.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use ocean_client::StatusClass;
///
/// assert_eq!(StatusClass::of(StatusCode::ACCEPTED), StatusClass::Success);
/// assert_eq!(StatusClass::of(StatusCode::NOT_FOUND), StatusClass::ClientError);
/// assert_eq!(StatusClass::of(StatusCode::BAD_GATEWAY), StatusClass::ServerError);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// Status `<= 400`.
    Success,
    /// Status in `(400, 500]`.
    ClientError,
    /// Status `> 500`.
    ServerError,
}

impl StatusClass {
    /// Classifies a status code.
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            code if code > 500 => StatusClass::ServerError,
            code if code > 400 => StatusClass::ClientError,
            _ => StatusClass::Success,
        }
    }
}

/// The outcome of one HTTP round trip.
///
/// Returned directly on success and boxed inside [`Error::ClientError`] /
/// [`Error::ServerError`] on failure.
///
/// # Examples
///
/// ```no_run
/// use ocean_client::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Droplet {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), ocean_client::Error> {
/// let client = Client::new("my-token")?;
///
/// let response = client.get("/droplets/3164494").await?;
/// let droplet: Droplet = response.field("droplet")?;
///
/// println!("{} ({}) took {:?}", droplet.name, droplet.id, response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body, `None` when the body was empty.
    pub text: Option<String>,

    /// The body decoded as JSON.
    ///
    /// `None` when the body was empty or was not valid JSON; in the latter case
    /// `text` still holds the payload.
    pub data: Option<Value>,

    /// Time from sending the request until the body was fully read.
    pub latency: Duration,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        text: Option<String>,
        data: Option<Value>,
        latency: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            text,
            data,
            latency,
        }
    }

    /// Returns the decoded body, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the raw body, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Consumes the response and returns the decoded body.
    pub fn into_data(self) -> Option<Value> {
        self.data
    }

    /// Decodes the whole envelope into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEnvelope`] if the body was not JSON or does not
    /// match `T`.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let data = self.data.as_ref().ok_or_else(|| Error::UnexpectedEnvelope {
            key: None,
            reason: "response had no JSON body".to_string(),
        })?;

        T::deserialize(data).map_err(|e| Error::UnexpectedEnvelope {
            key: None,
            reason: e.to_string(),
        })
    }

    /// Projects the named top-level field of the envelope into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedEnvelope`] if the body was not JSON, the key is
    /// absent, or its value does not match `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ocean_client::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     None,
    ///     Some(serde_json::json!({"tag": {"name": "web"}})),
    ///     Duration::from_millis(12),
    /// );
    ///
    /// let tag: serde_json::Value = response.field("tag").unwrap();
    /// assert_eq!(tag["name"], "web");
    /// assert!(response.field::<serde_json::Value>("tags").is_err());
    /// ```
    pub fn field<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .ok_or_else(|| Error::UnexpectedEnvelope {
                key: Some(key.to_string()),
                reason: "field missing from response".to_string(),
            })?;

        T::deserialize(value).map_err(|e| Error::UnexpectedEnvelope {
            key: Some(key.to_string()),
            reason: e.to_string(),
        })
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}: {}", self.status, text),
            None => write!(f, "{}", self.status),
        }
    }
}

/// Decodes a raw body as JSON, returning `None` when it is not valid JSON.
pub(crate) fn decode_body(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn response_with(data: Option<Value>) -> Response {
        Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            data.as_ref().map(Value::to_string),
            data,
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(StatusClass::of(StatusCode::OK), StatusClass::Success);
        assert_eq!(StatusClass::of(StatusCode::NO_CONTENT), StatusClass::Success);
        assert_eq!(StatusClass::of(StatusCode::FOUND), StatusClass::Success);
        assert_eq!(StatusClass::of(StatusCode::BAD_REQUEST), StatusClass::Success);
        assert_eq!(
            StatusClass::of(StatusCode::UNAUTHORIZED),
            StatusClass::ClientError
        );
        assert_eq!(
            StatusClass::of(StatusCode::TOO_MANY_REQUESTS),
            StatusClass::ClientError
        );
        assert_eq!(
            StatusClass::of(StatusCode::INTERNAL_SERVER_ERROR),
            StatusClass::ClientError
        );
        assert_eq!(
            StatusClass::of(StatusCode::NOT_IMPLEMENTED),
            StatusClass::ServerError
        );
        assert_eq!(
            StatusClass::of(StatusCode::SERVICE_UNAVAILABLE),
            StatusClass::ServerError
        );
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(r#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(decode_body("[1,2]"), Some(json!([1, 2])));
        assert_eq!(decode_body("<html>busy</html>"), None);
        assert_eq!(decode_body(r#"{"a":1} trailing"#), None);
    }

    #[test]
    fn test_field_projection() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Domain {
            name: String,
            ttl: u32,
        }

        let response = response_with(Some(json!({
            "domain": {"name": "example.com", "ttl": 1800}
        })));

        let domain: Domain = response.field("domain").unwrap();
        assert_eq!(
            domain,
            Domain {
                name: "example.com".to_string(),
                ttl: 1800
            }
        );

        match response.field::<Domain>("domains") {
            Err(Error::UnexpectedEnvelope { key, .. }) => {
                assert_eq!(key.as_deref(), Some("domains"));
            }
            other => panic!("Expected UnexpectedEnvelope, got {:?}", other),
        }

        assert!(response.field::<Vec<Domain>>("domain").is_err());
    }

    #[test]
    fn test_json_without_body() {
        let response = response_with(None);
        match response.json::<Value>() {
            Err(Error::UnexpectedEnvelope { key: None, reason }) => {
                assert!(reason.contains("no JSON body"));
            }
            other => panic!("Expected UnexpectedEnvelope, got {:?}", other),
        }
    }

    #[test]
    fn test_header_lookup() {
        let mut response = response_with(None);
        response
            .headers
            .insert("ratelimit-remaining", "4999".parse().unwrap());

        assert_eq!(response.header("ratelimit-remaining"), Some("4999"));
        assert_eq!(response.header("x-missing"), None);
    }
}
