//! Raw HTTP responses.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A response from the device, exactly as the transport received it.
///
/// Failed responses are handed unchanged to `error` listeners and carried by
/// [`Error::Status`](crate::Error::Status).
///
/// # Example
///
/// ```
/// use wled_rs::Response;
///
/// let response = Response::new(200, "http://10.0.0.2/json/info")
///     .with_header("Content-Type", "application/json")
///     .with_body(r#"{"ver":"0.14.0"}"#);
///
/// assert!(response.is_success());
/// assert_eq!(response.header("content-type"), Some("application/json"));
/// assert_eq!(response.json::<serde_json::Value>().unwrap()["ver"], "0.14.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    url: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, url: &str) -> Self {
        Response {
            status,
            url: url.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns `true` for statuses in 200-299.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::JsonLoad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_success_range() {
        assert!(Response::new(200, "u").is_success());
        assert!(Response::new(204, "u").is_success());
        assert!(Response::new(299, "u").is_success());
        assert!(!Response::new(199, "u").is_success());
        assert!(!Response::new(301, "u").is_success());
        assert!(!Response::new(500, "u").is_success());
    }

    #[test]
    fn test_json_body() {
        let response = Response::new(200, "u").with_body(r#"{"x":1}"#);
        assert_eq!(response.json::<Value>().unwrap(), json!({"x": 1}));
    }

    #[test]
    fn test_malformed_json_body() {
        let response = Response::new(200, "u").with_body("<html>");
        assert!(matches!(response.json::<Value>(), Err(Error::JsonLoad(_))));
        assert_eq!(response.text(), "<html>");
    }

    #[test]
    fn test_missing_header() {
        let response = Response::new(200, "u").with_header("Server", "WLED");
        assert_eq!(response.header("SERVER"), Some("WLED"));
        assert!(response.header("content-length").is_none());
    }
}
