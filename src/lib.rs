//! Biobank Store is a client-side entity store for a biobank specimen-tracking
//! backend.
//!
//! Each entity type (studies, users, shipments) is held in a normalized store:
//! an entity table keyed by ID, a search-result cache keyed by the canonical
//! serialization of the search parameters, and an in-flight flag gating cache
//! reads. A REST client performs the network calls; effect helpers drive the
//! request/success/failure round trip through the store's pure reducer.
//!
//! ## Core Components
//! - [`store`]: entity table, search cache, reducer, selectors and dispatcher.
//! - [`domain`]: plain data records for the backend's wire format.
//! - [`client`]: REST services for the `/api` endpoints.

pub mod client;
pub mod domain;
pub mod store;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PagedReply, SearchParams};

/// Errors returned by the biobank store and its REST services.
#[derive(Error, Debug)]
pub enum Error {
    /// The network request could not be completed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server rejected the request (validation failure, stale version, ...).
    #[error("server rejected request ({status}): {message}")]
    Api { status: u16, message: String },
    /// The server reply did not have the expected envelope shape.
    #[error("unexpected reply: {0}")]
    Reply(String),
    /// An unknown attribute name was passed to an update operation.
    #[error("invalid attribute name for update: {0}")]
    InvalidAttribute(String),
    /// An unknown state-transition action was requested.
    #[error("invalid state change: {0}")]
    InvalidStateAction(String),
    /// Error during JSON serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// An I/O error occurred while reading persisted session data.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for biobank store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The concurrency surface every stored entity exposes.
///
/// An entity's ID never changes and its version increases by exactly one on
/// every accepted update. Update requests echo the last-known version; the
/// server rejects stale ones and the client only relays that rejection.
pub trait EntityModel {
    /// The unique ID that identifies an object of this type.
    fn id(&self) -> &str;
    /// The optimistic-concurrency token echoed back on updates.
    fn version(&self) -> u64;
}

/// Read operations every entity endpoint provides.
///
/// Implemented by the REST services in [`client`] and by in-process fakes in
/// tests.
#[async_trait]
pub trait EntityApi<T: EntityModel>: Send + Sync {
    /// Runs a paged search on the entity's `search` endpoint.
    async fn search(&self, params: &SearchParams) -> Result<PagedReply<T>>;
    /// Retrieves a single entity by its slug.
    async fn get(&self, slug: &str) -> Result<T>;
}
