//! # domainr-rs: a Rust client for the Domainr API
//!
//! Looks up candidate domains for a search term and registration metadata
//! for a single domain. Responses are requested with gzip/deflate encoding
//! and decoded into typed structures.
//!
//! ## Key Features
//!
//! - `search` and `info` lookups in async, blocking, callback and lenient
//!   task forms
//! - Optional `client_id` attribution on every request
//! - Pluggable [`Transport`] for pointing the client at test doubles
//!
//! ## Basic Usage
//!
//! ```no_run
//! use domainr_rs::{new_client, DomainrError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DomainrError> {
//!     let client = new_client("my-app");
//!
//!     if let Some(result) = client.search("rust lang").await? {
//!         for candidate in &result.results {
//!             println!("{} {:?}", candidate.domain, candidate.availability);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod client;
pub mod config;
pub mod decode;
pub mod transport;

pub use client::DomainrClient;
pub use config::{DomainrConfig, Endpoint};
pub use transport::{HttpTransport, Transport};
pub use types::{
    sanitize_error_message, Availability, ClientId, DomainCandidate, DomainInfo, DomainrError,
    DomainrResult, LookupEvent, Registrar, SearchResult, Subdomain, TldInfo,
};

pub mod prelude {
    //! Convenient imports for commonly used types and functions
    pub use crate::{
        from_env, new_client, Availability, DomainCandidate, DomainInfo, DomainrClient,
        DomainrConfig, DomainrError, DomainrResult, LookupEvent, SearchResult,
    };
}

// Entry point functions
pub fn new_client(client_id: impl Into<String>) -> DomainrClient {
    DomainrClient::new().with_client_id(client_id)
}

/// Create a client configured from `DOMAINR_CLIENT_ID` and `DOMAINR_BASE_URL`
pub fn from_env() -> Result<DomainrClient, DomainrError> {
    Ok(DomainrClient::from_config(DomainrConfig::from_env()?))
}
