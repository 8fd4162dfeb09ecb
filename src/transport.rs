// HTTP transport

use crate::types::*;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use url::Url;

/// Capability the client needs from the network: GET a URL and hand back
/// the decompressed body.
///
/// Implementations must advertise gzip and deflate support and decode the
/// body before returning it. A non-success status is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> DomainrResult<Bytes>;
}

/// Production transport backed by reqwest
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Self {
        let http_client = HttpClient::builder()
            .gzip(true)
            .deflate(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    /// Use a preconfigured reqwest client
    ///
    /// The client must have been built with gzip and deflate enabled.
    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> DomainrResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Err(DomainrError::api_error(
            status.canonical_reason().unwrap_or("Unknown error"),
            Some(status.as_u16()),
            if body.is_empty() { None } else { Some(body) },
            Some(concat!(file!(), ":", line!())),
        ))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> DomainrResult<Bytes> {
        tracing::debug!(path = url.path(), "sending request");

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainrError::from(e).at(concat!(file!(), ":", line!())))?;

        let response = self.handle_error_response(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainrError::from(e).at(concat!(file!(), ":", line!())))?;

        tracing::debug!(bytes = body.len(), "received response");
        Ok(body)
    }
}
