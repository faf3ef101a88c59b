//! Request description types.

use crate::{Error, Result};
use http::Method;
use serde::Serialize;

/// One HTTP request, ready for the transport.
///
/// The body is serialized when it is attached, so a value that cannot be
/// encoded as JSON is rejected before any network I/O happens.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use ocean_client::Request;
/// use serde_json::json;
///
/// let request = Request::new(Method::POST, "/tags")
///     .unwrap()
///     .with_json(&json!({"name": "web"}))
///     .unwrap();
///
/// assert_eq!(request.body(), Some(r#"{"name":"web"}"#));
/// assert!(request.sends_json());
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    body: Option<String>,
}

impl Request {
    /// Creates a body-less request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for methods other than HEAD, GET, PUT,
    /// POST, PATCH and DELETE, and [`Error::InvalidPath`] if `path` does not
    /// start with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self> {
        let path = path.into();

        if !is_supported(&method) {
            return Err(Error::InvalidRequest(format!(
                "Unsupported HTTP method {}",
                method
            )));
        }
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path));
        }

        Ok(Self {
            method,
            path,
            body: None,
        })
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for GET and HEAD requests, and
    /// [`Error::SerializationFailed`] if `body` cannot be encoded as JSON.
    pub fn with_json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        if self.method == Method::GET || self.method == Method::HEAD {
            return Err(Error::InvalidRequest(format!(
                "{} requests cannot carry a body",
                self.method
            )));
        }

        let json =
            serde_json::to_string(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.body = Some(json);
        Ok(self)
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path, including any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the serialized body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns `true` if the request is sent with `Content-Type: application/json`.
    ///
    /// Only PUT, POST and PATCH requests that carry a body are; a DELETE with a
    /// payload sends it without the header.
    pub fn sends_json(&self) -> bool {
        self.body.is_some()
            && (self.method == Method::PUT
                || self.method == Method::POST
                || self.method == Method::PATCH)
    }
}

fn is_supported(method: &Method) -> bool {
    [
        Method::HEAD,
        Method::GET,
        Method::PUT,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
    ]
    .contains(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_path_must_be_rooted() {
        match Request::new(Method::GET, "droplets") {
            Err(Error::InvalidPath(path)) => assert_eq!(path, "droplets"),
            other => panic!("Expected InvalidPath, got {:?}", other),
        }
        assert!(Request::new(Method::GET, "/droplets?tag_name=web").is_ok());
    }

    #[test]
    fn test_unsupported_method() {
        let result = Request::new(Method::OPTIONS, "/droplets");
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_get_and_head_reject_body() {
        for method in [Method::GET, Method::HEAD] {
            let result = Request::new(method, "/account")
                .unwrap()
                .with_json(&json!({"a": 1}));
            assert!(matches!(result, Err(Error::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_content_type_only_for_write_verbs_with_body() {
        for method in [Method::PUT, Method::POST, Method::PATCH] {
            let bare = Request::new(method.clone(), "/tags").unwrap();
            assert!(!bare.sends_json());

            let with_body = bare.with_json(&json!({"name": "web"})).unwrap();
            assert!(with_body.sends_json(), "{} should send JSON", method);
        }

        let delete = Request::new(Method::DELETE, "/tags/web/resources")
            .unwrap()
            .with_json(&json!({"resources": []}))
            .unwrap();
        assert!(delete.body().is_some());
        assert!(!delete.sends_json());

        assert!(!Request::new(Method::GET, "/tags").unwrap().sends_json());
    }

    #[test]
    fn test_unserializable_body() {
        let mut body = HashMap::new();
        body.insert((1u8, 2u8), "tuple keys are not JSON object keys");

        let result = Request::new(Method::POST, "/tags").unwrap().with_json(&body);
        match result {
            Err(Error::SerializationFailed(message)) => {
                assert!(message.contains("key must be a string"));
            }
            other => panic!("Expected SerializationFailed, got {:?}", other),
        }
    }
}
