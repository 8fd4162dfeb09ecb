//! Endpoint and client id configuration.
//!
//! The endpoints are plain values on [`DomainrConfig`] so that tests and
//! self-hosted mirrors can point the client somewhere other than the public
//! service.

use crate::types::*;
use url::Url;

/// Public search endpoint
pub const DEFAULT_SEARCH_URL: &str = "http://domai.nr/api/json/search";
/// Public info endpoint
pub const DEFAULT_INFO_URL: &str = "http://domai.nr/api/json/info";

/// Environment variable holding the client id used by [`DomainrConfig::from_env`]
pub const CLIENT_ID_ENV: &str = "DOMAINR_CLIENT_ID";
/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "DOMAINR_BASE_URL";

/// Which endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Info,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomainrConfig {
    pub search_url: Url,
    pub info_url: Url,
    pub client_id: Option<ClientId>,
}

impl Default for DomainrConfig {
    fn default() -> Self {
        Self {
            search_url: Url::parse(DEFAULT_SEARCH_URL).expect("default search url is valid"),
            info_url: Url::parse(DEFAULT_INFO_URL).expect("default info url is valid"),
            client_id: None,
        }
    }
}

impl DomainrConfig {
    /// Build a configuration from `DOMAINR_CLIENT_ID` and `DOMAINR_BASE_URL`
    ///
    /// Both variables are optional; unset ones fall back to the defaults.
    pub fn from_env() -> DomainrResult<Self> {
        let mut config = Self::default();
        if let Ok(base) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(&base)?;
        }
        if let Ok(id) = std::env::var(CLIENT_ID_ENV) {
            config.client_id = ClientId::new(id);
        }
        Ok(config)
    }

    /// Derive both endpoints from a base URL as `<base>/search` and `<base>/info`
    pub fn with_base_url(mut self, base: &str) -> DomainrResult<Self> {
        let base = base.trim_end_matches('/');
        self.search_url = parse_endpoint(&format!("{}/search", base))?;
        self.info_url = parse_endpoint(&format!("{}/info", base))?;
        Ok(self)
    }

    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = ClientId::new(id);
        self
    }

    /// Build the full request URL for `value` against the given endpoint
    ///
    /// `q` comes first, `client_id` is appended only when configured.
    pub fn request_url(&self, endpoint: Endpoint, value: &str) -> Url {
        let mut url = match endpoint {
            Endpoint::Search => self.search_url.clone(),
            Endpoint::Info => self.info_url.clone(),
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", value);
            if let Some(id) = &self.client_id {
                query.append_pair("client_id", id.as_str());
            }
        }
        url
    }
}

fn parse_endpoint(raw: &str) -> DomainrResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| DomainrError::ConfigError(format!("invalid endpoint url {}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(DomainrError::ConfigError(format!("endpoint url {} cannot carry a query", raw)));
    }
    Ok(url)
}
