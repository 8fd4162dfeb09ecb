// Core types and errors

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The result type used throughout the Domainr client
pub type DomainrResult<T> = Result<T, DomainrError>;

/// Convert reqwest::Error to our DomainrError
///
/// The URL is stripped from the error first since it carries the client id.
impl From<reqwest::Error> for DomainrError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        match err.status() {
            Some(status) => DomainrError::ApiError {
                status: status.as_u16(),
                message: err.to_string(),
                response_body: None,
                location: None,
            },
            None => DomainrError::RequestError {
                message: err.to_string(),
                location: None,
                source: Some(Arc::new(err) as Arc<dyn std::error::Error + Send + Sync>),
            },
        }
    }
}

/// Optional usage-attribution token sent as `client_id` with every request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap a client id, treating an empty string as "no client id"
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone)]
pub enum DomainrError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("API request failed: {message}")]
    RequestError {
        message: String,
        location: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("API returned error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        response_body: Option<String>,
        location: Option<String>,
    },

    #[error("Failed to parse API response: {message}")]
    ParseError {
        message: String,
        source_text: Option<String>,
        location: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Availability signal reported by the service for a domain
///
/// Unrecognised values are kept verbatim in `Other` so that re-encoding a
/// decoded record gives back the original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    Available,
    Maybe,
    Taken,
    Unavailable,
    Tld,
    Reserved,
    Other(String),
}

impl Availability {
    pub fn as_str(&self) -> &str {
        match self {
            Availability::Available => "available",
            Availability::Maybe => "maybe",
            Availability::Taken => "taken",
            Availability::Unavailable => "unavailable",
            Availability::Tld => "tld",
            Availability::Reserved => "reserved",
            Availability::Other(value) => value,
        }
    }

    /// Whether the domain can be registered right now
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl From<String> for Availability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "available" => Availability::Available,
            "maybe" => Availability::Maybe,
            "taken" => Availability::Taken,
            "unavailable" => Availability::Unavailable,
            "tld" => Availability::Tld,
            "reserved" => Availability::Reserved,
            _ => Availability::Other(value),
        }
    }
}

impl From<Availability> for String {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of the `search` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<DomainCandidate>,
}

/// One candidate domain returned by a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainCandidate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
}

/// Response of the `info` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_idna: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subdomains: Vec<Subdomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tld: Option<TldInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registrars: Vec<Registrar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub www_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whois_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subdomain {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subdomain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Zone-level data for the domain's top-level domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TldInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_idna: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registrar {
    #[serde(default, deserialize_with = "null_as_default")]
    pub registrar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
}

/// Completion event delivered to callbacks by the fire-and-forget calls
#[derive(Debug, Clone)]
pub enum LookupEvent<T> {
    /// The request finished. `None` means the service returned no result.
    Completed(Option<T>),
    /// The request or the decoding of its response failed
    Failed(DomainrError),
}

impl<T> LookupEvent<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, LookupEvent::Failed(_))
    }

    /// Convert back into the result shape of the strict calls
    pub fn into_result(self) -> DomainrResult<Option<T>> {
        match self {
            LookupEvent::Completed(value) => Ok(value),
            LookupEvent::Failed(err) => Err(err),
        }
    }
}

impl<T> From<DomainrResult<Option<T>>> for LookupEvent<T> {
    fn from(result: DomainrResult<Option<T>>) -> Self {
        match result {
            Ok(value) => LookupEvent::Completed(value),
            Err(err) => LookupEvent::Failed(err),
        }
    }
}

impl DomainrError {
    pub fn request_error<T: Into<String>>(
        message: T,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::RequestError {
            message: sanitize_error_message(&message.into()),
            location: location.map(String::from),
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        error.log();
        error
    }

    pub fn parse_error<T: Into<String>>(
        message: T,
        source_text: Option<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::ParseError {
            message: message.into(),
            source_text,
            location: location.map(String::from),
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        error.log();
        error
    }

    pub fn api_error<T: Into<String>>(
        message: T,
        status: Option<u16>,
        response_body: Option<String>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::ApiError {
            message: sanitize_error_message(&message.into()),
            status: status.unwrap_or(500),
            response_body: response_body.map(|body| sanitize_error_message(&body)),
            location: location.map(String::from),
        };
        error.log();
        error
    }

    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    fn log(&self) {
        if let Some(loc) = self.location() {
            log::error!("{} at {}", self, loc);
        } else {
            log::error!("{}", self);
        }
    }

    /// Attach a `file:line` location to errors converted with `?`
    pub fn at(mut self, at: &str) -> Self {
        match &mut self {
            Self::RequestError { location, .. }
            | Self::ApiError { location, .. }
            | Self::ParseError { location, .. } => *location = Some(at.to_string()),
            _ => {}
        }
        self
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::RequestError { location, .. } => location.as_deref(),
            Self::ApiError { location, .. } => location.as_deref(),
            Self::ParseError { location, .. } => location.as_deref(),
            _ => None,
        }
    }

    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Self::RequestError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            Self::ParseError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            _ => None,
        }
    }

    /// Network, connection or HTTP status failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestError { .. } | Self::ApiError { .. })
    }

    /// Malformed or unexpected JSON
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Create a request error capturing file and line
#[macro_export]
macro_rules! request_error {
    ($message:expr) => {
        $crate::DomainrError::request_error($message, None::<reqwest::Error>, Some(concat!(file!(), ":", line!())))
    };
    ($message:expr, $source:expr) => {
        $crate::DomainrError::request_error($message, Some($source), Some(concat!(file!(), ":", line!())))
    };
}

/// Create a parse error capturing file and line
#[macro_export]
macro_rules! parse_error {
    ($message:expr, $source_text:expr) => {
        $crate::DomainrError::parse_error($message, Some($source_text), None::<serde_json::Error>, Some(concat!(file!(), ":", line!())))
    };
    ($message:expr, $source_text:expr, $source:expr) => {
        $crate::DomainrError::parse_error($message, Some($source_text), Some($source), Some(concat!(file!(), ":", line!())))
    };
}

lazy_static! {
    static ref CLIENT_ID_PARAM: Regex = Regex::new(r"(client_id=)[^&\s#]*").unwrap();
}

/// Redact `client_id` query values so they never end up in logs or errors
pub fn sanitize_error_message(message: &str) -> String {
    CLIENT_ID_PARAM.replace_all(message, "${1}[REDACTED]").into_owned()
}
