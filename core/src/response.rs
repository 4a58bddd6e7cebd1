//! Builds a `Response` out of what a transport reports on completion.

use std::collections::BTreeMap;

use serde_json::Map;

use crate::error::{Error, Result};
use crate::http::{RawResponse, Response};

/// Parse a raw header blob into a name → value mapping.
///
/// Lines are split on `\n` with trailing `\r` removed; blank lines are
/// skipped. Each line is split on the first `": "`. A line without the
/// separator is kept with a `None` value. Later duplicates overwrite earlier
/// ones.
pub fn parse_header_blob(raw: &str) -> BTreeMap<String, Option<String>> {
    let mut headers = BTreeMap::new();
    for line in raw.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match line.split_once(": ") {
            Some((name, value)) => headers.insert(name.to_string(), Some(value.to_string())),
            None => headers.insert(line.to_string(), None),
        };
    }
    headers
}

impl Response {
    /// Build a response from a status code, raw header blob and raw body.
    ///
    /// The body must be valid JSON. An empty body is not, so a successful
    /// exchange without content fails here with `Error::Parse`.
    pub fn build(status: u16, raw_headers: &str, raw_body: &str) -> Result<Response> {
        let header = parse_header_blob(raw_headers);
        let data = serde_json::from_str(raw_body).map_err(|source| Error::Parse { status, source })?;
        Ok(Response {
            status,
            header,
            data,
            extensions: Map::new(),
        })
    }

    pub fn from_raw(raw: &RawResponse) -> Result<Response> {
        Response::build(raw.status, &raw.headers, &raw.body)
    }
}
