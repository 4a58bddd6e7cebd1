//! Request and response interceptors.
//!
//! An interceptor list may hold entries that are not callable for a given
//! phase: inert values loaded from JSON config, or a response hook sitting in
//! the request list. Those are skipped without error. The first callback that
//! returns `Err` stops the run.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BoxError, Error, Phase, Result};
use crate::http::{RequestOptions, Response};

pub type RequestHook = Arc<dyn Fn(&mut RequestOptions) -> std::result::Result<(), BoxError> + Send + Sync>;
pub type ResponseHook = Arc<dyn Fn(Option<&mut Response>) -> std::result::Result<(), BoxError> + Send + Sync>;

/// One entry of an interceptor list.
#[derive(Clone)]
pub enum Interceptor {
    Request(RequestHook),
    Response(ResponseHook),
    /// A non-callable entry.
    Inert(Value),
}

impl Interceptor {
    pub fn request<F>(f: F) -> Self
    where
        F: Fn(&mut RequestOptions) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        Interceptor::Request(Arc::new(f))
    }

    /// The hook receives `None` when response encapsulation is off.
    pub fn response<F>(f: F) -> Self
    where
        F: Fn(Option<&mut Response>) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        Interceptor::Response(Arc::new(f))
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interceptor::Request(_) => f.write_str("Interceptor::Request(..)"),
            Interceptor::Response(_) => f.write_str("Interceptor::Response(..)"),
            Interceptor::Inert(value) => f.debug_tuple("Interceptor::Inert").field(value).finish(),
        }
    }
}

impl From<Value> for Interceptor {
    fn from(value: Value) -> Self {
        Interceptor::Inert(value)
    }
}

pub fn run_request_interceptors(interceptors: &[Interceptor], options: &mut RequestOptions) -> Result<()> {
    for (index, interceptor) in interceptors.iter().enumerate() {
        let Interceptor::Request(hook) = interceptor else {
            continue;
        };
        hook(options).map_err(|source| Error::Interceptor {
            phase: Phase::Request,
            index,
            source,
        })?;
    }
    Ok(())
}

pub fn run_response_interceptors(interceptors: &[Interceptor], mut response: Option<&mut Response>) -> Result<()> {
    for (index, interceptor) in interceptors.iter().enumerate() {
        let Interceptor::Response(hook) = interceptor else {
            continue;
        };
        hook(response.as_deref_mut()).map_err(|source| Error::Interceptor {
            phase: Phase::Response,
            index,
            source,
        })?;
    }
    Ok(())
}
