//! Async document store client for Folio
//!
//! Executes [`ProjectedQuery`](folio_core::ProjectedQuery) values
//! against the remote content store and returns immutable
//! [`Document`](folio_doc_types::Document) snapshots.
//!
//! The client performs a single bounded I/O call per request: it
//! honors a per-call deadline, supports external cancellation, and
//! never retries; transient failures surface as retryable errors for
//! the caller's backoff policy. An optional read-through cache keyed
//! by query value sits in front of the network.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use cache::QueryCache;
pub use client::StoreContext;
pub use config::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT, StoreConfig};
pub use error::{Result, StoreError};
