//! Verb-based request dispatcher.
//!
//! # Design
//! `Client` owns a `Transport` and a handle to the shared `DefaultConfig`.
//! A call runs through three stages:
//!
//! 1. `prepare`: build `RequestOptions`, merge the defaults (base URL prefix,
//!    default headers under the caller's), run request interceptors and
//!    resolve the `HttpRequest`. The config snapshot taken here is used for
//!    the rest of the call.
//! 2. the transport exchange, which suspends the calling task until it
//!    completes.
//! 3. `complete`: build the `Response` if encapsulation is on, run response
//!    interceptors, then settle on the raw transport status.
//!
//! `prepare` and `complete` are public so a host that performs its own I/O
//! can drive the pipeline without a `Transport`.

use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ConfigSnapshot, DefaultConfig};
use crate::error::{Error, Result};
use crate::http::{CallOptions, HttpMethod, HttpRequest, RawResponse, RequestOptions, Response};
use crate::interceptor::{run_request_interceptors, run_response_interceptors};
use crate::transport::Transport;

/// HTTP client applying a shared default configuration to every call.
///
/// Calls resolve to `Ok(Some(response))` for statuses in `200..300`, or
/// `Ok(None)` when encapsulation is off. Everything else is an `Err`.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    config: DefaultConfig,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: DefaultConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DefaultConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Any body on the call options is ignored.
    pub async fn get(&self, call: impl Into<CallOptions>) -> Result<Option<Response>> {
        self.request(HttpMethod::Get, call.into()).await
    }

    pub async fn post(&self, call: impl Into<CallOptions>) -> Result<Option<Response>> {
        self.request(HttpMethod::Post, call.into()).await
    }

    pub async fn put(&self, call: impl Into<CallOptions>) -> Result<Option<Response>> {
        self.request(HttpMethod::Put, call.into()).await
    }

    pub async fn delete(&self, call: impl Into<CallOptions>) -> Result<Option<Response>> {
        self.request(HttpMethod::Delete, call.into()).await
    }

    pub async fn request(&self, method: HttpMethod, call: CallOptions) -> Result<Option<Response>> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("request", %request_id, %method, url = %call.url);

        let (request, snapshot) = span.in_scope(|| self.prepare(method, call))?;

        async move {
            tracing::debug!(url = %request.url, headers = request.headers.len(), "dispatching");
            let raw = self.transport.send(request).await.map_err(|e| {
                tracing::warn!(error = %e, "transport failed");
                Error::from(e)
            })?;
            tracing::debug!(status = raw.status, "exchange complete");
            complete(raw, &snapshot)
        }
        .instrument(span)
        .await
    }

    /// Steps up to the transport call: build, merge defaults, run request
    /// interceptors. Returns the resolved request and the config snapshot the
    /// rest of the call must use.
    pub fn prepare(&self, method: HttpMethod, call: CallOptions) -> Result<(HttpRequest, ConfigSnapshot)> {
        let snapshot = self.config.snapshot();
        let mut options = RequestOptions::new(method, call);
        merge_defaults(&mut options, &snapshot);
        run_request_interceptors(&snapshot.request_interceptors, &mut options)?;
        Ok((options.into_http_request(), snapshot))
    }
}

/// Steps after the transport call: build the response, run response
/// interceptors, settle on the transport status.
pub fn complete(raw: RawResponse, snapshot: &ConfigSnapshot) -> Result<Option<Response>> {
    let status = raw.status;
    let mut response = if snapshot.is_encapsulation_response {
        match Response::from_raw(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(status, error = %e, "response body is not JSON");
                return Err(e);
            }
        }
    } else {
        None
    };

    run_response_interceptors(&snapshot.response_interceptors, response.as_mut())?;

    if (200..300).contains(&status) {
        Ok(response)
    } else {
        tracing::warn!(status, "request rejected");
        Err(Error::Rejected { status, response })
    }
}

/// Prefix the base URL by plain concatenation and merge default headers
/// under the caller's own.
fn merge_defaults(options: &mut RequestOptions, defaults: &ConfigSnapshot) {
    if !defaults.base_url.is_empty() {
        options.url = format!("{}{}", defaults.base_url, options.url);
    }
    if !defaults.header.is_empty() {
        let mut header = defaults.header.clone();
        if let Some(own) = options.header.take() {
            header.extend(own);
        }
        options.header = Some(header);
    }
}
