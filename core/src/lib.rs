//! Small HTTP client layer with shared defaults and interceptors.
//!
//! # Overview
//! `Client` exposes `get`, `post`, `put` and `delete`. Every call merges the
//! shared `DefaultConfig` (base URL, default headers), runs request
//! interceptors, hands the resolved request to a `Transport`, builds a
//! `Response` out of the raw status/header blob/body, runs response
//! interceptors and settles on the status code.
//!
//! # Design
//! - The default config is an explicit handle injected into each client;
//!   clones share state, and every call works on a snapshot of it.
//! - Config fields are changed through typed setters or the validated
//!   `DefaultConfig::update`.
//! - The transport is a trait, so any network stack can sit underneath.
//!   `UreqTransport` is bundled; hosts doing their own I/O can call
//!   `Client::prepare` and `complete` directly.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod response;
pub mod transport;

pub use client::{complete, Client};
pub use config::{ConfigField, ConfigSnapshot, ConfigValue, DefaultConfig, FIELD_NAMES};
pub use error::{BoxError, Error, Phase, Result, TransportError};
pub use http::{CallOptions, Headers, HttpMethod, HttpRequest, RawResponse, RequestOptions, Response};
pub use interceptor::Interceptor;
pub use response::parse_header_blob;
pub use transport::{Transport, UreqTransport};
