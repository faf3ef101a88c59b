//! Error types for API calls.
//!
//! Every failure the crate can produce is a variant of [`Error`]. HTTP failures are
//! classified into two coarse bands, [`Error::ClientError`] and [`Error::ServerError`],
//! and both carry the complete [`Response`] (status, headers, raw text and decoded
//! data) so callers can branch on the finer-grained status code when they need to.

use crate::response::Response;
use http::StatusCode;
use serde_json::Value;

/// Coarse classification of an [`Error`].
///
/// Use [`Error::kind`] to branch on the category of a failure without matching on
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A local precondition failed before any network I/O was attempted.
    LocalValidation,
    /// The request body could not be encoded as JSON.
    Serialization,
    /// The service rejected the request (status in `(400, 500]`).
    ClientError,
    /// The service failed to handle the request (status `> 500`).
    ServerError,
    /// The request never produced an HTTP response.
    Network,
    /// A successful response did not have the expected envelope shape.
    Envelope,
    /// A polling loop spent its attempt budget without reaching a terminal state.
    PollExhausted,
    /// The client was configured with invalid values.
    Configuration,
}

/// The main error type for API calls.
///
/// # Examples
///
/// ```no_run
/// use ocean_client::{Client, Error, ErrorKind};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("my-token")?;
///
/// match client.get("/droplets/999").await {
///     Ok(response) => println!("Droplet: {:?}", response.data),
///     Err(err) if err.kind() == ErrorKind::ClientError => {
///         eprintln!("Rejected with {:?}: {:?}", err.status(), err.data());
///     }
///     Err(err) => return Err(err),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required field of an action request was missing.
    ///
    /// Raised synchronously before the request reaches the transport.
    #[error("Invalid {action} action: missing required field `{field}`")]
    Validation {
        /// The action type being validated (`"unknown"` when the type itself is missing)
        action: String,
        /// The wire name of the missing field
        field: &'static str,
    },

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The request path was not a relative path starting with `/`.
    #[error("Invalid request path {0:?}: must start with '/'")]
    InvalidPath(String),

    /// The request was malformed (unsupported method, body on a GET/HEAD, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service answered with a status in `(400, 500]`.
    #[error("Client error {0}")]
    ClientError(Box<Response>),

    /// The service answered with a status above 500.
    #[error("Server error {0}")]
    ServerError(Box<Response>),

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The decoded response did not contain what the caller projected out of it.
    #[error("Unexpected response envelope at `{}`: {reason}", .key.as_deref().unwrap_or("<root>"))]
    UnexpectedEnvelope {
        /// The envelope key being projected, `None` for the whole envelope
        key: Option<String>,
        /// Why the projection failed
        reason: String,
    },

    /// A polling loop gave up before the polled resource reached a terminal state.
    #[error("Gave up polling after {attempts} attempts without reaching a terminal state")]
    PollAttemptsExhausted {
        /// The number of fetches performed
        attempts: usize,
    },

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::InvalidPath(_) | Error::InvalidRequest(_) => {
                ErrorKind::LocalValidation
            }
            Error::SerializationFailed(_) => ErrorKind::Serialization,
            Error::ClientError(_) => ErrorKind::ClientError,
            Error::ServerError(_) => ErrorKind::ServerError,
            Error::Network(_) => ErrorKind::Network,
            Error::UnexpectedEnvelope { .. } => ErrorKind::Envelope,
            Error::PollAttemptsExhausted { .. } => ErrorKind::PollExhausted,
            Error::ConfigurationError(_) | Error::InvalidUrl(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the HTTP response carried by a classified error.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::ClientError(response) | Error::ServerError(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|response| response.status)
    }

    /// Returns the raw response body if this error has one.
    pub fn text(&self) -> Option<&str> {
        self.response()?.text.as_deref()
    }

    /// Returns the decoded response body if this error has one and it was valid JSON.
    pub fn data(&self) -> Option<&Value> {
        self.response()?.data.as_ref()
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use serde_json::json;
    use std::time::Duration;

    fn not_found() -> Response {
        Response::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            Some(r#"{"id":"not_found"}"#.to_string()),
            Some(json!({"id": "not_found"})),
            Duration::from_millis(3),
        )
    }

    #[test]
    fn test_kinds() {
        let validation = Error::Validation {
            action: "attach".to_string(),
            field: "droplet_id",
        };
        assert_eq!(validation.kind(), ErrorKind::LocalValidation);
        assert_eq!(
            Error::InvalidPath("droplets".to_string()).kind(),
            ErrorKind::LocalValidation
        );
        assert_eq!(
            Error::SerializationFailed("bad".to_string()).kind(),
            ErrorKind::Serialization
        );
        assert_eq!(
            Error::ClientError(Box::new(not_found())).kind(),
            ErrorKind::ClientError
        );
        assert_eq!(
            Error::ServerError(Box::new(not_found())).kind(),
            ErrorKind::ServerError
        );
        assert_eq!(
            Error::PollAttemptsExhausted { attempts: 3 }.kind(),
            ErrorKind::PollExhausted
        );
    }

    #[test]
    fn test_classified_error_exposes_response() {
        let err = Error::ClientError(Box::new(not_found()));

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.text(), Some(r#"{"id":"not_found"}"#));
        assert_eq!(err.data().and_then(|d| d["id"].as_str()), Some("not_found"));
    }

    #[test]
    fn test_local_errors_have_no_response() {
        let err = Error::InvalidRequest("GET requests cannot carry a body".to_string());
        assert!(err.response().is_none());
        assert!(err.status().is_none());
        assert!(err.data().is_none());
    }

    #[test]
    fn test_display() {
        let err = Error::Validation {
            action: "resize".to_string(),
            field: "size_gigabytes",
        };
        assert_eq!(
            err.to_string(),
            "Invalid resize action: missing required field `size_gigabytes`"
        );

        let err = Error::UnexpectedEnvelope {
            key: None,
            reason: "response had no JSON body".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected response envelope at `<root>`: response had no JSON body"
        );

        let err = Error::ClientError(Box::new(not_found()));
        assert!(err.to_string().starts_with("Client error 404 Not Found"));
    }
}
