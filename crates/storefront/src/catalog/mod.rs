//! Catalog reads.
//!
//! Every fresh fetch goes through the same pipeline: raw store value →
//! [`normalize`] → [`ordering`] → optional [`filter`]. Single-record reads are
//! cached in memory for ten minutes and retried once on failure.

pub mod filter;
pub mod normalize;
pub mod ordering;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, error, instrument, warn};

use harafish_core::{Book, BookId, CategorySelector};

use crate::error::Result;
use crate::store::{BOOKS_PATH, DocumentStore, book_path};

pub use filter::{filter_by_category, newest};
pub use normalize::{normalize_collection, normalize_images, normalize_record};
pub use ordering::{priority, sort_by_priority, sorted_by_priority};

/// Single-record cache lifetime.
const BOOK_CACHE_TTL: Duration = Duration::from_secs(600);

/// Read access to the listings in a document store.
pub struct Catalog<S> {
    inner: Arc<CatalogInner<S>>,
}

struct CatalogInner<S> {
    store: Arc<S>,
    cache: Cache<BookId, Book>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DocumentStore> Catalog<S> {
    /// Create a catalog over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(BOOK_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogInner { store, cache }),
        }
    }

    /// The underlying store, shared with the admin mutator.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    /// Fetch every listing, normalized and in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Book>> {
        let raw = self.inner.store.get(BOOKS_PATH).await?;
        let books = sorted_by_priority(normalize_collection(raw.as_ref()));
        debug!(count = books.len(), "Fetched catalog");
        Ok(books)
    }

    /// Like [`Self::fetch_all`], but a failed read yields an empty catalog.
    pub async fn books_or_empty(&self) -> Vec<Book> {
        match self.fetch_all().await {
            Ok(books) => books,
            Err(e) => {
                error!(error = %e, "Failed to fetch catalog, showing empty list");
                Vec::new()
            }
        }
    }

    /// Fetch the listings in one category, in display order.
    ///
    /// A specific category is queried server-side; `All` reads everything and
    /// an unknown label returns nothing without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip(self), fields(category = %selector))]
    pub async fn fetch_category(&self, selector: &CategorySelector) -> Result<Vec<Book>> {
        match selector {
            CategorySelector::All => self.fetch_all().await,
            CategorySelector::Unknown(_) => Ok(Vec::new()),
            CategorySelector::Only(category) => {
                let raw = self
                    .inner
                    .store
                    .query(BOOKS_PATH, "category", category.label())
                    .await?;
                let books = normalize_collection(raw.as_ref());
                // The server-side match is on the raw label; re-check the canonical value.
                Ok(sorted_by_priority(filter_by_category(&books, selector)))
            }
        }
    }

    /// Fetch one listing by a raw id (e.g. from a link).
    ///
    /// Malformed ids are rejected before any fetch. A failed read is retried
    /// once. `Ok(None)` means the listing does not exist.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed ids, or the store error if
    /// the retry also fails.
    #[instrument(skip(self))]
    pub async fn fetch_book(&self, raw_id: &str) -> Result<Option<Book>> {
        let id = BookId::parse(raw_id)?;

        if let Some(book) = self.inner.cache.get(&id).await {
            debug!("Cache hit for book");
            return Ok(Some(book));
        }

        let path = book_path(&id);
        let raw = match self.inner.store.get(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Book fetch failed, retrying once");
                self.inner.store.get(&path).await?
            }
        };

        // Only an object is a listing; anything else is not a book.
        let Some(book) = raw
            .filter(serde_json::Value::is_object)
            .and_then(|value| normalize_record(id.as_str(), &value))
        else {
            debug!("Book not found");
            return Ok(None);
        };

        self.inner.cache.insert(id, book.clone()).await;
        Ok(Some(book))
    }

    /// Drop a cached listing after it was written or deleted.
    pub async fn invalidate(&self, id: &BookId) {
        self.inner.cache.invalidate(id).await;
    }
}
