// Core Client Implementation

use crate::config::{DomainrConfig, Endpoint};
use crate::decode::{decode_body, swallow_decode_error};
use crate::request_error;
use crate::transport::{HttpTransport, Transport};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Runtime used by blocking calls and by callbacks issued outside tokio
///
/// Shared by every client and never shut down, so lookups spawned on it
/// outlive the client that started them.
static BACKGROUND: OnceLock<Runtime> = OnceLock::new();

/// Client for the Domainr search and info endpoints
///
/// Every lookup comes in four forms with deliberately different error
/// reporting:
///
/// - `search` / `info`: async, decode failures are errors
/// - `search_blocking` / `info_blocking`: same contract, blocks the caller
/// - `search_with_callback` / `info_with_callback`: returns immediately and
///   hands exactly one [`LookupEvent`] to the callback
/// - `search_task` / `info_task`: async, decode failures resolve to `Ok(None)`
///
/// Empty input is rejected with [`DomainrError::InvalidArgument`] before any
/// request is made, in all forms.
#[derive(Clone)]
pub struct DomainrClient {
    pub(crate) config: DomainrConfig,
    pub(crate) transport: Arc<dyn Transport>,
}

impl Default for DomainrClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DomainrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainrClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DomainrClient {
    /// Create a client for the public endpoints without a client id
    pub fn new() -> Self {
        Self::from_config(DomainrConfig::default())
    }

    pub fn from_config(config: DomainrConfig) -> Self {
        Self {
            config,
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Set the client id sent with every request. An empty id clears it.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.set_client_id(id);
        self
    }

    /// Point both endpoints at `<url>/search` and `<url>/info`
    pub fn with_base_url(mut self, url: &str) -> DomainrResult<Self> {
        self.config = self.config.with_base_url(url)?;
        Ok(self)
    }

    /// Replace the transport, e.g. with a test double
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.config.client_id.as_ref().map(ClientId::as_str)
    }

    /// Change the client id for all subsequent requests
    pub fn set_client_id(&mut self, id: impl Into<String>) {
        self.config.client_id = ClientId::new(id);
    }

    pub fn config(&self) -> &DomainrConfig {
        &self.config
    }

    /// Search for candidate domains matching `term`
    pub async fn search(&self, term: &str) -> DomainrResult<Option<SearchResult>> {
        self.lookup(Endpoint::Search, term).await
    }

    /// Blocking form of [`search`](Self::search)
    ///
    /// Must not be called from within an async runtime.
    pub fn search_blocking(&self, term: &str) -> DomainrResult<Option<SearchResult>> {
        self.lookup_blocking(Endpoint::Search, term)
    }

    /// Start a search and report its outcome to `callback`
    pub fn search_with_callback<F>(&self, term: impl Into<String>, callback: F) -> DomainrResult<JoinHandle<()>>
    where
        F: FnOnce(LookupEvent<SearchResult>) + Send + 'static,
    {
        self.lookup_with_callback(Endpoint::Search, term.into(), callback)
    }

    /// Search, resolving to `Ok(None)` when the response cannot be decoded
    pub async fn search_task(&self, term: &str) -> DomainrResult<Option<SearchResult>> {
        swallow_decode_error(self.search(term).await)
    }

    /// Fetch registration and availability metadata for `domain`
    pub async fn info(&self, domain: &str) -> DomainrResult<Option<DomainInfo>> {
        self.lookup(Endpoint::Info, domain).await
    }

    /// Blocking form of [`info`](Self::info)
    ///
    /// Must not be called from within an async runtime.
    pub fn info_blocking(&self, domain: &str) -> DomainrResult<Option<DomainInfo>> {
        self.lookup_blocking(Endpoint::Info, domain)
    }

    /// Start an info lookup and report its outcome to `callback`
    pub fn info_with_callback<F>(&self, domain: impl Into<String>, callback: F) -> DomainrResult<JoinHandle<()>>
    where
        F: FnOnce(LookupEvent<DomainInfo>) + Send + 'static,
    {
        self.lookup_with_callback(Endpoint::Info, domain.into(), callback)
    }

    /// Info lookup, resolving to `Ok(None)` when the response cannot be decoded
    pub async fn info_task(&self, domain: &str) -> DomainrResult<Option<DomainInfo>> {
        swallow_decode_error(self.info(domain).await)
    }

    async fn lookup<T: DeserializeOwned>(&self, endpoint: Endpoint, value: &str) -> DomainrResult<Option<T>> {
        validate_input(endpoint, value)?;
        execute(&self.config, self.transport.as_ref(), endpoint, value).await
    }

    fn lookup_blocking<T: DeserializeOwned>(&self, endpoint: Endpoint, value: &str) -> DomainrResult<Option<T>> {
        validate_input(endpoint, value)?;
        if Handle::try_current().is_ok() {
            return Err(request_error!("blocking lookups cannot run inside an async runtime"));
        }
        background()?.block_on(self.lookup(endpoint, value))
    }

    fn lookup_with_callback<T, F>(&self, endpoint: Endpoint, value: String, callback: F) -> DomainrResult<JoinHandle<()>>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(LookupEvent<T>) + Send + 'static,
    {
        validate_input(endpoint, &value)?;

        // Owned copies so the task keeps running if the client is dropped
        let config = self.config.clone();
        let transport = Arc::clone(&self.transport);
        self.spawn(async move {
            let result = execute(&config, transport.as_ref(), endpoint, &value).await;
            callback(LookupEvent::from(result));
        })
    }

    fn spawn<F>(&self, task: F) -> DomainrResult<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => Ok(handle.spawn(task)),
            Err(_) => Ok(background()?.spawn(task)),
        }
    }
}

fn background() -> DomainrResult<&'static Runtime> {
    if let Some(runtime) = BACKGROUND.get() {
        return Ok(runtime);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("domainr-background")
        .enable_all()
        .build()
        .map_err(|e| request_error!("failed to start background runtime", e))?;
    // Losing the race just drops the spare runtime
    let _ = BACKGROUND.set(runtime);

    BACKGROUND
        .get()
        .ok_or_else(|| request_error!("background runtime unavailable"))
}

fn validate_input(endpoint: Endpoint, value: &str) -> DomainrResult<()> {
    if value.is_empty() {
        let what = match endpoint {
            Endpoint::Search => "search term",
            Endpoint::Info => "domain",
        };
        return Err(DomainrError::invalid_argument(format!("{} cannot be empty", what)));
    }
    Ok(())
}

async fn execute<T: DeserializeOwned>(
    config: &DomainrConfig,
    transport: &dyn Transport,
    endpoint: Endpoint,
    value: &str,
) -> DomainrResult<Option<T>> {
    let url = config.request_url(endpoint, value);
    tracing::debug!(endpoint = endpoint.as_str(), query = value, "domainr lookup");

    let body = transport.get(url).await.map_err(|e| {
        tracing::debug!(endpoint = endpoint.as_str(), error = %e, "domainr lookup failed");
        e
    })?;

    decode_body(&body)
}
