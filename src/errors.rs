use std::time::Duration;

use crate::response::Response;

/// All error types that can occur when talking to a WLED device.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device answered with a status outside 200-299.
    ///
    /// The same response is also emitted as an `error` event on the client.
    #[error("request to {} failed with status {}", .0.url(), .0.status())]
    Status(Response),

    /// The request did not settle before the client timeout and was aborted.
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The transport could not complete the request (connect, TLS, body read...).
    #[error("transport error requesting {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Failed to deserialize a JSON body.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),
}

impl Error {
    /// Create a new transport error
    pub fn transport(url: &str, reason: impl ToString) -> Self {
        Error::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(url: &str, after: Duration) -> Self {
        Error::Timeout {
            url: url.to_string(),
            after,
        }
    }

    /// The failed response, if the device answered at all.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Status(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = Error::Status(Response::new(404, "http://10.0.0.2/json/info"));
        assert_eq!(
            err.to_string(),
            "request to http://10.0.0.2/json/info failed with status 404"
        );
        assert_eq!(err.response().map(Response::status), Some(404));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_has_no_response() {
        let err = Error::timeout("http://10.0.0.2/json/state", Duration::from_millis(5000));
        assert!(err.is_timeout());
        assert!(err.response().is_none());
        assert_eq!(
            err,
            Error::timeout("http://10.0.0.2/json/state", Duration::from_secs(5))
        );
    }
}
