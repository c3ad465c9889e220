//! Remote document store.
//!
//! # Architecture
//!
//! - The store is the source of truth for listings - the storefront keeps only
//!   an in-memory copy and patches it after successful writes
//! - Paths are slash separated: `books` for the collection, `books/{id}` for a record
//! - `update` is a shallow merge, there are no transactions
//!
//! # Implementations
//!
//! - [`FirebaseStore`] - Firebase Realtime Database over its REST API
//! - [`MemoryStore`] - In-process tree used by tests and local demos

mod firebase;
mod memory;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

use std::future::Future;

use serde_json::{Map, Value};
use thiserror::Error;

use harafish_core::BookId;

/// Collection path for listings.
pub const BOOKS_PATH: &str = "books";

/// Path of a single listing.
#[must_use]
pub fn book_path(id: &BookId) -> String {
    format!("{BOOKS_PATH}/{id}")
}

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The path cannot be addressed (e.g. writing below a scalar).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A push did not return the generated key.
    #[error("push to {0} returned no key")]
    MissingKey(String),

    /// The store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Operations the storefront needs from a hierarchical JSON document store.
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`. `None` when nothing is stored there.
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Read the children of `path` whose `field` equals `value`.
    ///
    /// Returns the matching subset of the object at `path`, or `None` when
    /// nothing matches.
    fn query(
        &self,
        path: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Shallow-merge `fields` into the object at `path`.
    fn update(
        &self,
        path: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete the value at `path`.
    fn remove(&self, path: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Append `value` under `path` with a generated key and return the key.
    fn push(&self, path: &str, value: Value) -> impl Future<Output = Result<String, StoreError>> + Send;
}
