//! WLED device client.

use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::ClientOptions;
use crate::emitter::{EventEmitter, Listener};
use crate::errors::Error;
use crate::event_target::ListenerId;
use crate::history::{Outcome, RequestHistory};
use crate::resource::Resource;
use crate::response::Response;
use crate::runtime::{self, Mutex};
use crate::transport::HttpTransport;

#[cfg(feature = "transport-reqwest")]
use crate::transport::ReqwestTransport;

type Result<T> = std::result::Result<T, Error>;

/// Name of the event emitted for every non-success response.
pub const ERROR_EVENT: &str = "error";

/// Client for a single WLED device's JSON API.
///
/// The endpoint is derived from the options once, at construction. Every
/// query is one GET request bounded by [`Client::timeout`]. A response with a
/// status outside 200-299 is reported twice: as an [`ERROR_EVENT`] carrying
/// the [`Response`], and as [`Error::Status`] returned to the caller.
///
/// # Example
///
/// ```no_run
/// use wled_rs::{Client, ClientOptions};
///
/// # async fn run() -> Result<(), wled_rs::Error> {
/// let client = Client::new(ClientOptions::new("192.168.1.50").port(80));
/// client.on_error(|response: wled_rs::Response| {
///     eprintln!("{} answered {}", response.url(), response.status());
/// });
///
/// let info = client.get_info().await?;
/// println!("running WLED {}", info["ver"]);
/// # Ok(())
/// # }
/// ```
pub struct Client<T: HttpTransport> {
    options: ClientOptions,
    endpoint: String,
    timeout: Duration,
    is_connected: bool,
    connection_attempts: u32,
    events: EventEmitter,
    transport: T,
    history: Mutex<RequestHistory>,
}

#[cfg(feature = "transport-reqwest")]
impl Client<ReqwestTransport> {
    /// Creates a client using the default reqwest transport.
    ///
    /// Accepts a bare host (`"192.168.1.50"`) or full [`ClientOptions`].
    pub fn new(options: impl Into<ClientOptions>) -> Self {
        Self::with_transport(options, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> Client<T> {
    pub const TIMEOUT_MS: u64 = 5000;

    pub fn with_transport(options: impl Into<ClientOptions>, transport: T) -> Self {
        let options = options.into();
        let endpoint = options.endpoint();
        debug!("WLED client for {endpoint}");

        Client {
            options,
            endpoint,
            timeout: Duration::from_millis(Self::TIMEOUT_MS),
            is_connected: false,
            connection_attempts: 0,
            events: EventEmitter::new(),
            transport,
            history: Mutex::new(RequestHistory::new()),
        }
    }

    /// Base URL of the JSON API, e.g. `http://192.168.1.50/json`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Upper bound on each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Always `false`: the client holds no persistent connection.
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    /// Always `0`: requests are never retried.
    pub fn connection_attempts(&self) -> u32 {
        self.connection_attempts
    }

    /// The client's event emitter. Failed responses are emitted as
    /// [`ERROR_EVENT`] with a single [`Response`] argument.
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Registers a listener for [`ERROR_EVENT`].
    pub fn on_error<L: Listener<(Response,)>>(&self, listener: L) -> ListenerId {
        self.events.on(ERROR_EVENT, listener)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Queries the device info object.
    pub async fn get_info(&self) -> Result<Value> {
        self.get(Resource::Info).await
    }

    /// Queries the current state object.
    pub async fn get_state(&self) -> Result<Value> {
        self.get(Resource::State).await
    }

    /// Queries the stored presets.
    pub async fn get_presets(&self) -> Result<Value> {
        self.get(Resource::Presets).await
    }

    /// Queries the device configuration.
    pub async fn get_config(&self) -> Result<Value> {
        self.get(Resource::Config).await
    }

    /// Queries `resource` and returns its body as untyped JSON.
    pub async fn get(&self, resource: Resource) -> Result<Value> {
        self.get_as(resource).await
    }

    /// Queries `resource` and deserializes its body into `D`.
    pub async fn get_as<D: DeserializeOwned>(&self, resource: Resource) -> Result<D> {
        let response = self.fetch(resource).await?;
        let parsed = response.json::<D>();

        let mut history = self.history.lock().await;
        match &parsed {
            Ok(_) => history.record(
                resource,
                response.url(),
                Some(response.status()),
                Outcome::Success,
            ),
            Err(e) => {
                history.record(
                    resource,
                    response.url(),
                    Some(response.status()),
                    Outcome::InvalidJson,
                );
                history.record_error(&e.to_string());
            }
        }
        parsed
    }

    pub async fn history(&self) -> RequestHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Returns configuration, state flags and a history summary.
    ///
    /// Does not touch the network.
    pub async fn diagnostics(&self) -> Value {
        let summary = self.history.lock().await.summary();
        json!({
            "endpoint": self.endpoint,
            "is_connected": self.is_connected,
            "connection_attempts": self.connection_attempts,
            "timeout_ms": self.timeout.as_millis() as u64,
            "retry_options": serde_json::to_value(&self.options.retry_options)
                .unwrap_or(Value::Null),
            "error_listeners": self.events.listener_count(ERROR_EVENT),
            "history": serde_json::to_value(summary).unwrap_or(Value::Null),
        })
    }

    /// Issues one timeout-bounded GET and checks its status.
    ///
    /// This is the single place where a failed response is detected; it both
    /// emits [`ERROR_EVENT`] and returns [`Error::Status`].
    async fn fetch(&self, resource: Resource) -> Result<Response> {
        let url = resource.url(&self.endpoint);
        debug!("GET {url}");

        let result = match runtime::timeout(self.timeout, self.transport.get(&url)).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(&url, self.timeout)),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("request to {url} failed: {e}");
                let outcome = if e.is_timeout() {
                    Outcome::Timeout
                } else {
                    Outcome::TransportError
                };
                let mut history = self.history.lock().await;
                history.record(resource, &url, None, outcome);
                history.record_error(&e.to_string());
                return Err(e);
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        warn!("{url} answered with status {}", response.status());
        {
            let mut history = self.history.lock().await;
            history.record(resource, &url, Some(response.status()), Outcome::HttpError);
            history.record_error(&format!("status {}", response.status()));
        }

        self.events.emit(ERROR_EVENT, (response.clone(),));
        Err(Error::Status(response))
    }
}

impl<T: HttpTransport + std::fmt::Debug> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("is_connected", &self.is_connected)
            .field("connection_attempts", &self.connection_attempts)
            .field("events", &self.events)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
