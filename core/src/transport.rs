//! The transport boundary: whatever actually moves bytes over the network.
//!
//! # Design
//! A transport receives a resolved `HttpRequest` (method, url, headers, and a
//! body for everything but GET) and completes exactly once with a
//! `RawResponse`: the status, every response header as one raw
//! `name: value\r\n` blob, and the body as text. Status codes are data, never
//! errors; `Err` is reserved for exchanges that did not complete at all.
//!
//! `UreqTransport` is the bundled implementation. ureq is blocking, so each
//! exchange runs on tokio's blocking pool and the calling task is suspended
//! until it finishes. It must therefore be driven from inside a tokio runtime.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, RawResponse};

/// Executes one HTTP exchange.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// Transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        // 4xx/5xx must come back as data so the pipeline can build a response
        // for rejected calls too.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let agent = self.agent.clone();
        async move {
            tokio::task::spawn_blocking(move || execute(&agent, request))
                .await
                .map_err(|e| TransportError::with_source("transport task did not complete", e))?
        }
    }
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<RawResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => {
            let mut builder = agent.get(&url);
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Delete if body.is_none() => {
            let mut builder = agent.delete(&url);
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Delete | HttpMethod::Post | HttpMethod::Put => {
            let mut builder = match method {
                HttpMethod::Post => agent.post(&url),
                HttpMethod::Put => agent.put(&url),
                _ => agent.delete(&url).force_send_body(),
            };
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(|e| TransportError::with_source(format!("{method} {url}"), e))?;

    let status = response.status().as_u16();
    let headers = header_blob(response.headers());
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::with_source(format!("reading body of {method} {url}"), e))?;

    Ok(RawResponse { status, headers, body })
}

/// Serialize response headers the way browsers expose them: one
/// `name: value` line per header name, each terminated by `\r\n`. Repeated
/// names are joined with `, ` on a single line.
fn header_blob(headers: &ureq::http::HeaderMap) -> String {
    let mut blob = String::new();
    for name in headers.keys() {
        let values: Vec<_> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
            .collect();
        blob.push_str(name.as_str());
        blob.push_str(": ");
        blob.push_str(&values.join(", "));
        blob.push_str("\r\n");
    }
    blob
}

#[cfg(test)]
mod tests {
    use ureq::http::{HeaderMap, HeaderValue};

    use super::*;
    use crate::response::parse_header_blob;

    #[test]
    fn header_blob_is_crlf_terminated() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("x-request-id", HeaderValue::from_static("abc"));
        let blob = header_blob(&headers);
        assert!(blob.ends_with("\r\n"));
        assert_eq!(blob.matches("\r\n").count(), 2);

        let parsed = parse_header_blob(&blob);
        assert_eq!(parsed["content-type"].as_deref(), Some("application/json"));
        assert_eq!(parsed["x-request-id"].as_deref(), Some("abc"));
    }

    #[test]
    fn repeated_headers_share_one_line() {
        let mut headers = HeaderMap::new();
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.append("vary", HeaderValue::from_static("origin"));
        headers.insert("etag", HeaderValue::from_static("\"v1\""));
        let blob = header_blob(&headers);
        assert_eq!(blob.matches("vary: ").count(), 1);

        let parsed = parse_header_blob(&blob);
        assert_eq!(parsed["vary"].as_deref(), Some("accept, origin"));
        assert_eq!(parsed["etag"].as_deref(), Some("\"v1\""));
    }

    #[test]
    fn empty_header_map_gives_empty_blob() {
        assert_eq!(header_blob(&HeaderMap::new()), "");
    }
}
