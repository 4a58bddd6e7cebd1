//! HTTP data types flowing through the request pipeline.
//!
//! # Design
//! Requests and responses are plain data. `CallOptions` is what a caller hands
//! to one of the verb methods, `RequestOptions` is the mutable request that
//! defaults and interceptors rewrite, and `HttpRequest` is the resolved value a
//! `Transport` executes. On the way back a transport produces a `RawResponse`
//! (status, raw header blob, raw body text), which the response builder turns
//! into a `Response`.
//!
//! All fields use owned types so values can move freely between the caller,
//! interceptors and a transport running on another thread.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Header mapping used for outgoing requests and default headers.
pub type Headers = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied part of a request: everything except the method.
///
/// `Client::get("/users")` works through the `From<&str>` impl; headers and
/// bodies are attached with the builder methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    pub url: String,
    pub header: Option<Headers>,
    pub body: Option<String>,
}

impl CallOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            header: None,
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the request body and mark it as JSON.
    ///
    /// A `content-type` the caller already set is left untouched.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_string(value).map_err(Error::Serialization)?;
        let header = self.header.get_or_insert_with(Headers::new);
        if !header.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
            header.insert("content-type".to_string(), "application/json".to_string());
        }
        self.body = Some(body);
        Ok(self)
    }
}

impl From<&str> for CallOptions {
    fn from(url: &str) -> Self {
        CallOptions::new(url)
    }
}

impl From<String> for CallOptions {
    fn from(url: String) -> Self {
        CallOptions::new(url)
    }
}

/// The in-flight request. Default config and request interceptors mutate it
/// before it is handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub url: String,
    pub header: Option<Headers>,
    pub body: Option<String>,
}

impl RequestOptions {
    /// GET never carries a body, whatever the caller passed.
    pub fn new(method: HttpMethod, call: CallOptions) -> Self {
        let body = match method {
            HttpMethod::Get => None,
            _ => call.body,
        };
        Self {
            method,
            url: call.url,
            header: call.header,
            body,
        }
    }

    /// Resolve into the request a transport executes.
    pub fn into_http_request(self) -> HttpRequest {
        let headers = self.header.map(|h| h.into_iter().collect()).unwrap_or_default();
        let body = match self.method {
            HttpMethod::Get => None,
            _ => self.body,
        };
        HttpRequest {
            method: self.method,
            url: self.url,
            headers,
            body,
        }
    }
}

/// A fully resolved HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// What a transport reports once an exchange has finished.
///
/// `headers` is the raw blob of `name: value` lines separated by `\r\n`, the
/// same shape browsers expose for all response headers at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: String,
    pub body: String,
}

/// Normalized response handed to response interceptors and to the caller.
///
/// `header` keys keep the case they were received with. A header line without
/// a `": "` separator shows up with a `None` value. `extensions` is free-form
/// space for interceptors to attach their own properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub header: BTreeMap<String, Option<String>>,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl Response {
    /// Look up a header by its exact name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header.get(name).and_then(|v| v.as_deref())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the parsed body into a concrete type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|source| Error::Parse {
            status: self.status,
            source,
        })
    }
}
