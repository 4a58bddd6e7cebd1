//! Error types for the request pipeline.
//!
//! # Design
//! Configuration mistakes (`ConfigType`, `UnknownConfigField`) are returned
//! synchronously from the setter and leave the config untouched. Everything
//! that goes wrong during a call ends up as the `Err` side of that call:
//! a non-2xx status (`Rejected`), an unparseable body (`Parse`), a failing
//! interceptor or a transport that could not complete the exchange.

use std::fmt;

use thiserror::Error;

use crate::http::Response;

/// Boxed error returned by interceptors and transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline phase an interceptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Request,
    Response,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Request => f.write_str("request"),
            Phase::Response => f.write_str("response"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A config field was given a value of the wrong shape.
    #[error("`{field}` must be a {expected}")]
    ConfigType {
        field: &'static str,
        expected: &'static str,
    },

    /// A config field outside the fixed set was addressed.
    #[error("unknown config field `{field}`, only these fields can be set:\n{}", bullet_list(.valid))]
    UnknownConfigField {
        field: String,
        valid: &'static [&'static str],
    },

    /// The response body was not valid JSON (an empty body included).
    #[error("response body with status {status} is not valid JSON: {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A request payload could not be serialized.
    #[error("request body serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// An interceptor returned an error; the remaining ones did not run.
    #[error("{phase} interceptor #{index} failed: {source}")]
    Interceptor {
        phase: Phase,
        index: usize,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The exchange completed with a status outside `200..300`.
    ///
    /// `response` is `None` when response encapsulation is turned off.
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        response: Option<Response>,
    },
}

impl Error {
    /// Status code of the completed exchange, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Parse { status, .. } | Error::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The built response attached to a rejection.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Rejected { response, .. } => response.as_ref(),
            _ => None,
        }
    }
}

/// The transport could not complete the exchange (DNS, refused connection,
/// reset, unreadable body).
#[derive(Debug, Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
