//! Client configuration and endpoint derivation.

use serde::{Deserialize, Serialize};

/// Default additional delay factor between retry attempts.
pub const DEFAULT_DECAY: f64 = 1.5;

/// Default interval between retry attempts, in milliseconds.
pub const DEFAULT_INTERVAL: u64 = 1000;

/// Retry settings accepted by the client.
///
/// These are carried with the configuration but no request path consults them
/// yet: every query is a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Client should attempt to reconnect.
    pub retry: bool,
    /// Additional time factor between attempts.
    pub decay: f64,
    /// Time between attempts, in milliseconds.
    pub interval: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        RetryOptions {
            retry: false,
            decay: DEFAULT_DECAY,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Connection options for a WLED device.
///
/// Missing fields fall back to their defaults, both when building the value in
/// code and when deserializing it:
///
/// ```
/// use wled_rs::ClientOptions;
///
/// let options: ClientOptions =
///     serde_json::from_str(r#"{"host": "wled.local", "port": 8080}"#).unwrap();
/// assert!(!options.https);
/// assert_eq!(options.endpoint(), "http://wled.local:8080/json");
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOptions {
    /// IP address or host name of the device. Not validated.
    pub host: String,
    /// Use `https` instead of `http`.
    pub https: bool,
    /// Port of the device. `None` or `0` leaves the scheme default.
    pub port: Option<u16>,
    pub retry_options: RetryOptions,
}

impl ClientOptions {
    pub fn new(host: &str) -> Self {
        ClientOptions {
            host: host.to_string(),
            ..Self::default()
        }
    }

    pub fn https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn retry_options(mut self, retry_options: RetryOptions) -> Self {
        self.retry_options = retry_options;
        self
    }

    /// Base URL of the device's JSON API: `scheme://host[:port]/json`.
    pub fn endpoint(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        match self.port.filter(|port| *port != 0) {
            Some(port) => format!("{scheme}://{}:{port}/json", self.host),
            None => format!("{scheme}://{}/json", self.host),
        }
    }
}

impl From<&str> for ClientOptions {
    fn from(host: &str) -> Self {
        ClientOptions::new(host)
    }
}

impl From<String> for ClientOptions {
    fn from(host: String) -> Self {
        ClientOptions {
            host,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoint() {
        assert_eq!(
            ClientOptions::new("127.0.0.1").endpoint(),
            "http://127.0.0.1/json"
        );
    }

    #[test]
    fn test_https_endpoint() {
        assert_eq!(
            ClientOptions::new("127.0.0.1").https(true).endpoint(),
            "https://127.0.0.1/json"
        );
    }

    #[test]
    fn test_https_endpoint_with_port() {
        assert_eq!(
            ClientOptions::new("127.0.0.1").https(true).port(1234).endpoint(),
            "https://127.0.0.1:1234/json"
        );
        assert_eq!(
            ClientOptions::new("127.0.0.1").port(80).endpoint(),
            "http://127.0.0.1:80/json"
        );
    }

    #[test]
    fn test_zero_port_is_omitted() {
        assert_eq!(
            ClientOptions::new("wled.local").port(0).endpoint(),
            "http://wled.local/json"
        );
    }

    #[test]
    fn test_empty_host_is_not_validated() {
        assert_eq!(ClientOptions::default().endpoint(), "http:///json");
    }

    #[test]
    fn test_defaults() {
        let options = ClientOptions::from("10.0.0.2");
        assert_eq!(options.host, "10.0.0.2");
        assert!(!options.https);
        assert!(options.port.is_none());
        assert!(!options.retry_options.retry);
        assert_eq!(options.retry_options.decay, DEFAULT_DECAY);
        assert_eq!(options.retry_options.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_defaults_are_not_shared() {
        let mut first = ClientOptions::from(String::from("a"));
        first.retry_options.retry = true;
        first.https = true;

        let second = ClientOptions::from("b");
        assert!(!second.https);
        assert!(!second.retry_options.retry);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ClientOptions = serde_json::from_str(
            r#"{"host":"127.0.0.1","https":true,"port":1234,"retryOptions":{"retry":true}}"#,
        )
        .unwrap();

        assert_eq!(options.endpoint(), "https://127.0.0.1:1234/json");
        assert!(options.retry_options.retry);
        assert_eq!(options.retry_options.decay, DEFAULT_DECAY);
        assert_eq!(options.retry_options.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_serialize_skips_missing_port() {
        let value = serde_json::to_value(ClientOptions::new("wled.local")).unwrap();
        assert!(value.get("port").is_none());
        assert_eq!(value["retryOptions"]["interval"], 1000);
    }
}
