//! HTTP transport abstraction.
//!
//! The client issues requests through an [`HttpTransport`], so any HTTP stack
//! (or a test double) can sit underneath it. With the `transport-reqwest`
//! feature (default) [`ReqwestTransport`] is provided; it needs a tokio
//! runtime to drive it.

use std::future::Future;

use crate::errors::Error;
use crate::response::Response;

type Result<T> = std::result::Result<T, Error>;

/// Trait for issuing HTTP GET requests.
///
/// Implementations return a [`Response`] for any status the server sends;
/// only failures to obtain a response at all are errors. Dropping the
/// returned future must abort the request.
pub trait HttpTransport: Send + Sync {
    /// Fetch `url` and read the full body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Response>> + Send;
}

#[cfg(feature = "transport-reqwest")]
pub use reqwest_impl::ReqwestTransport;

#[cfg(feature = "transport-reqwest")]
mod reqwest_impl {
    use log::debug;

    use super::{HttpTransport, Result};
    use crate::errors::Error;
    use crate::response::Response;

    /// [`HttpTransport`] backed by a shared `reqwest::Client`.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a preconfigured client (proxies, TLS roots, ...).
        pub fn with_client(client: reqwest::Client) -> Self {
            ReqwestTransport { client }
        }
    }

    impl HttpTransport for ReqwestTransport {
        async fn get(&self, url: &str) -> Result<Response> {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::transport(url, e))?;

            let status = resp.status().as_u16();
            debug!("GET {url} -> {status}");

            let mut response = Response::new(status, resp.url().as_str());
            for (name, value) in resp.headers() {
                let value = String::from_utf8_lossy(value.as_bytes());
                response = response.with_header(name.as_str(), &value);
            }

            let body = resp.bytes().await.map_err(|e| Error::transport(url, e))?;
            Ok(response.with_body(body.to_vec()))
        }
    }
}
