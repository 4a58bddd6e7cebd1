//! Default configuration shared by every call a client makes.
//!
//! # Design
//! `DefaultConfig` is a clonable handle; clones see the same state. The field
//! set is fixed: base URL, default headers, the response encapsulation flag
//! and the two interceptor lists. Fields are changed either through the typed
//! setters or through `update`, which takes a field name and a dynamic
//! `ConfigValue` and checks both before anything is written.
//!
//! A call takes a `ConfigSnapshot` when it merges defaults, so changes made
//! while it is in flight only affect calls started afterwards.

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::Headers;
use crate::interceptor::Interceptor;

/// Names of the fields `update` accepts, in declaration order.
pub const FIELD_NAMES: &[&str] = &[
    "baseUrl",
    "header",
    "isEncapsulationResponse",
    "requestInterceptors",
    "responseInterceptors",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    BaseUrl,
    Header,
    IsEncapsulationResponse,
    RequestInterceptors,
    ResponseInterceptors,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::BaseUrl,
        ConfigField::Header,
        ConfigField::IsEncapsulationResponse,
        ConfigField::RequestInterceptors,
        ConfigField::ResponseInterceptors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigField::BaseUrl => "baseUrl",
            ConfigField::Header => "header",
            ConfigField::IsEncapsulationResponse => "isEncapsulationResponse",
            ConfigField::RequestInterceptors => "requestInterceptors",
            ConfigField::ResponseInterceptors => "responseInterceptors",
        }
    }

    /// The value shape this field accepts.
    pub fn expected(self) -> &'static str {
        match self {
            ConfigField::BaseUrl => "string",
            ConfigField::Header => "mapping of strings",
            ConfigField::IsEncapsulationResponse => "boolean",
            ConfigField::RequestInterceptors | ConfigField::ResponseInterceptors => "sequence",
        }
    }
}

impl FromStr for ConfigField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "baseUrl" => Ok(ConfigField::BaseUrl),
            "header" => Ok(ConfigField::Header),
            "isEncapsulationResponse" => Ok(ConfigField::IsEncapsulationResponse),
            "requestInterceptors" | "interceptors.request" => Ok(ConfigField::RequestInterceptors),
            "responseInterceptors" | "interceptors.response" => Ok(ConfigField::ResponseInterceptors),
            other => Err(Error::UnknownConfigField {
                field: other.to_string(),
                valid: FIELD_NAMES,
            }),
        }
    }
}

/// A dynamically shaped value for `DefaultConfig::update`.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    Text(String),
    Map(Headers),
    Flag(bool),
    List(Vec<Interceptor>),
    /// Anything that fits none of the shapes above.
    Other(Value),
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Flag(value)
    }
}

impl From<Headers> for ConfigValue {
    fn from(value: Headers) -> Self {
        ConfigValue::Map(value)
    }
}

impl From<Vec<Interceptor>> for ConfigValue {
    fn from(value: Vec<Interceptor>) -> Self {
        ConfigValue::List(value)
    }
}

impl From<Value> for ConfigValue {
    /// Objects whose values are all strings become a `Map`; array items become
    /// inert interceptor entries.
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ConfigValue::Text(s),
            Value::Bool(b) => ConfigValue::Flag(b),
            Value::Array(items) => ConfigValue::List(items.into_iter().map(Interceptor::Inert).collect()),
            Value::Object(map) if map.values().all(Value::is_string) => ConfigValue::Map(
                map.into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k, s)),
                        _ => None,
                    })
                    .collect(),
            ),
            other => ConfigValue::Other(other),
        }
    }
}

/// The state of a `DefaultConfig` at one point in time.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub base_url: String,
    pub header: Headers,
    pub is_encapsulation_response: bool,
    pub request_interceptors: Vec<Interceptor>,
    pub response_interceptors: Vec<Interceptor>,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            header: Headers::new(),
            is_encapsulation_response: true,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        }
    }
}

/// Shared, validated default configuration.
#[derive(Debug, Clone, Default)]
pub struct DefaultConfig {
    inner: Arc<RwLock<ConfigSnapshot>>,
}

impl DefaultConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a JSON object; see `apply_json`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let config = Self::new();
        config.apply_json(value)?;
        Ok(config)
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        self.inner.read().clone()
    }

    pub fn base_url(&self) -> String {
        self.inner.read().base_url.clone()
    }

    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.inner.write().base_url = base_url.into();
    }

    pub fn header(&self) -> Headers {
        self.inner.read().header.clone()
    }

    pub fn set_header(&self, header: Headers) {
        self.inner.write().header = header;
    }

    pub fn is_encapsulation_response(&self) -> bool {
        self.inner.read().is_encapsulation_response
    }

    pub fn set_encapsulation_response(&self, enabled: bool) {
        self.inner.write().is_encapsulation_response = enabled;
    }

    pub fn request_interceptors(&self) -> Vec<Interceptor> {
        self.inner.read().request_interceptors.clone()
    }

    pub fn set_request_interceptors(&self, interceptors: Vec<Interceptor>) {
        self.inner.write().request_interceptors = interceptors;
    }

    pub fn add_request_interceptor(&self, interceptor: Interceptor) {
        self.inner.write().request_interceptors.push(interceptor);
    }

    pub fn response_interceptors(&self) -> Vec<Interceptor> {
        self.inner.read().response_interceptors.clone()
    }

    pub fn set_response_interceptors(&self, interceptors: Vec<Interceptor>) {
        self.inner.write().response_interceptors = interceptors;
    }

    pub fn add_response_interceptor(&self, interceptor: Interceptor) {
        self.inner.write().response_interceptors.push(interceptor);
    }

    /// Replace one field by name.
    ///
    /// Fails with `UnknownConfigField` for names outside the fixed set and
    /// with `ConfigType` when the value has the wrong shape. Nothing is
    /// written on failure.
    pub fn update(&self, field: &str, value: impl Into<ConfigValue>) -> Result<()> {
        let assignment = Assignment::validate(field, value.into())?;
        let field = assignment.field();
        assignment.apply(&mut self.inner.write());
        tracing::debug!(field = field.name(), "default config updated");
        Ok(())
    }

    /// Apply every key of a JSON object as one batch.
    ///
    /// All keys are validated first; if any is invalid the error is returned
    /// and no field changes.
    pub fn apply_json(&self, value: &Value) -> Result<()> {
        let Value::Object(map) = value else {
            return Err(Error::ConfigType {
                field: "defaultConfig",
                expected: "mapping",
            });
        };
        let assignments = map
            .iter()
            .map(|(field, value)| Assignment::validate(field, value.clone().into()))
            .collect::<Result<Vec<_>>>()?;

        let mut inner = self.inner.write();
        for assignment in assignments {
            tracing::debug!(field = assignment.field().name(), "default config updated");
            assignment.apply(&mut inner);
        }
        Ok(())
    }
}

/// A field write whose name and value shape have already been checked.
enum Assignment {
    BaseUrl(String),
    Header(Headers),
    IsEncapsulationResponse(bool),
    RequestInterceptors(Vec<Interceptor>),
    ResponseInterceptors(Vec<Interceptor>),
}

impl Assignment {
    fn validate(field: &str, value: ConfigValue) -> Result<Self> {
        let field: ConfigField = field.parse()?;
        match (field, value) {
            (ConfigField::BaseUrl, ConfigValue::Text(url)) => Ok(Assignment::BaseUrl(url)),
            (ConfigField::Header, ConfigValue::Map(header)) => Ok(Assignment::Header(header)),
            (ConfigField::IsEncapsulationResponse, ConfigValue::Flag(flag)) => {
                Ok(Assignment::IsEncapsulationResponse(flag))
            }
            (ConfigField::RequestInterceptors, ConfigValue::List(list)) => Ok(Assignment::RequestInterceptors(list)),
            (ConfigField::ResponseInterceptors, ConfigValue::List(list)) => Ok(Assignment::ResponseInterceptors(list)),
            _ => Err(Error::ConfigType {
                field: field.name(),
                expected: field.expected(),
            }),
        }
    }

    fn field(&self) -> ConfigField {
        match self {
            Assignment::BaseUrl(_) => ConfigField::BaseUrl,
            Assignment::Header(_) => ConfigField::Header,
            Assignment::IsEncapsulationResponse(_) => ConfigField::IsEncapsulationResponse,
            Assignment::RequestInterceptors(_) => ConfigField::RequestInterceptors,
            Assignment::ResponseInterceptors(_) => ConfigField::ResponseInterceptors,
        }
    }

    fn apply(self, config: &mut ConfigSnapshot) {
        match self {
            Assignment::BaseUrl(url) => config.base_url = url,
            Assignment::Header(header) => config.header = header,
            Assignment::IsEncapsulationResponse(flag) => config.is_encapsulation_response = flag,
            Assignment::RequestInterceptors(list) => config.request_interceptors = list,
            Assignment::ResponseInterceptors(list) => config.response_interceptors = list,
        }
    }
}
