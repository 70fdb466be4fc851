//! # wled_rs
//!
//! An async Rust client for the JSON API of [WLED](https://kno.wled.ge) LED controllers.
//!
//! This crate reads a single device's info, state, presets and configuration
//! over HTTP. Every request is bounded by a timeout, and failed responses are
//! reported both to the caller and to `error` listeners on the client.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wled_rs::{Client, Response};
//!
//! async fn show_device() -> Result<(), wled_rs::Error> {
//!     // A bare host, or ClientOptions for https/port
//!     let client = Client::new("192.168.1.50");
//!
//!     client.on_error(|response: Response| {
//!         eprintln!("device answered {}", response.status());
//!     });
//!
//!     let state = client.get_state().await?;
//!     println!("on: {}, brightness: {}", state["on"], state["bri"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Endpoint derivation**: `scheme://host[:port]/json` from [`ClientOptions`]
//! - **Queries**: [`Client::get_info`], [`Client::get_state`],
//!   [`Client::get_presets`], [`Client::get_config`], or any [`Resource`]
//!   deserialized into your own types with [`Client::get_as`]
//! - **Events**: multi-argument listeners via [`EventEmitter`]
//! - **Pluggable HTTP**: implement [`HttpTransport`] to use any HTTP stack
//! - **Diagnostics**: request history and [`Client::diagnostics`]
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime
//! - `transport-reqwest` (default): Provide [`ReqwestTransport`] and
//!   `Client::new`. reqwest requires tokio; with another runtime disable it and
//!   pass your own transport to [`Client::with_transport`].

mod client;
mod config;
mod emitter;
mod errors;
mod event_target;
mod history;
mod resource;
mod response;
pub mod runtime;
mod transport;

// Re-export public API
pub use client::{Client, ERROR_EVENT};
pub use config::{ClientOptions, DEFAULT_DECAY, DEFAULT_INTERVAL, RetryOptions};
pub use emitter::{EventArgs, EventEmitter, Listener};
pub use errors::Error;
pub use event_target::{Event, EventCallback, EventTarget, ListenerId, ListenerOptions};
pub use history::{HistoryEntry, HistorySummary, Outcome, RequestHistory};
pub use resource::Resource;
pub use response::Response;
pub use transport::HttpTransport;
#[cfg(feature = "transport-reqwest")]
pub use transport::ReqwestTransport;
