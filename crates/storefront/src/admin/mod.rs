//! Admin session and catalog mutations.
//!
//! Every mutation writes to the remote store first and then patches the
//! local listing in place, so the admin view stays current without a full
//! re-fetch. A failed remote write leaves the local listing untouched.

mod fields;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, instrument, warn};

use harafish_core::{Book, BookId, BookStatus, Timestamp};

use crate::catalog::{Catalog, normalize_record};
use crate::config::AdminCredentials;
use crate::error::{Result, StorefrontError, add_breadcrumb};
use crate::images::{ImageFile, ImageHost};
use crate::search::admin_filter;
use crate::storage::{ADMIN_KEY, LocalStorage, StorageError};
use crate::store::{BOOKS_PATH, DocumentStore, StoreError, book_path};

pub use fields::{BookFields, ValidFields};

/// Admin operation rejected.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No admin session.
    #[error("admin login required")]
    Unauthorized,

    /// Email or password did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No admin credentials are configured.
    #[error("admin login is not configured")]
    NotConfigured,

    /// The session flag could not be read or written.
    #[error("session storage failed: {0}")]
    Session(#[from] StorageError),
}

/// The persisted "is admin" flag.
#[derive(Debug)]
pub struct AdminSession<S> {
    storage: S,
}

impl<S: LocalStorage> AdminSession<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Whether an admin is logged in. Unreadable storage counts as logged out.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.storage.get(ADMIN_KEY) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read admin session");
                false
            }
        }
    }

    /// Check credentials and persist the session flag.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotConfigured`] when no credentials are set,
    /// [`AdminError::InvalidCredentials`] on mismatch, or a storage error.
    #[instrument(skip(self, password, credentials))]
    pub fn login(
        &self,
        email: &str,
        password: &str,
        credentials: &AdminCredentials,
    ) -> std::result::Result<(), AdminError> {
        let (Some(expected_email), Some(expected_password)) =
            (credentials.email.as_deref(), credentials.password.as_ref())
        else {
            return Err(AdminError::NotConfigured);
        };

        if email.trim() != expected_email || password != expected_password.expose_secret() {
            warn!("Admin login rejected");
            return Err(AdminError::InvalidCredentials);
        }

        self.storage.set(ADMIN_KEY, "true")?;
        add_breadcrumb("admin", "Logged in", None);
        info!("Admin logged in");
        Ok(())
    }

    /// Drop the session flag.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn logout(&self) -> std::result::Result<(), AdminError> {
        self.storage.remove(ADMIN_KEY)?;
        info!("Admin logged out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] without an active session.
    pub fn require(&self) -> std::result::Result<(), AdminError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AdminError::Unauthorized)
        }
    }
}

/// Admin view of the catalog with write access.
pub struct AdminCatalog<S, H> {
    catalog: Catalog<S>,
    images: H,
    books: Vec<Book>,
}

impl<S: DocumentStore, H: ImageHost> AdminCatalog<S, H> {
    /// Open the admin view. Nothing is loaded until [`Self::refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] without an active session.
    pub fn open<L: LocalStorage>(
        session: &AdminSession<L>,
        catalog: Catalog<S>,
        images: H,
    ) -> std::result::Result<Self, AdminError> {
        session.require()?;
        Ok(Self {
            catalog,
            images,
            books: Vec::new(),
        })
    }

    /// Reload the listing from the store, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read; the previous listing is
    /// kept.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut books = self.catalog.fetch_all().await?;
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.books = books;
        Ok(())
    }

    /// The local listing.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    #[must_use]
    pub fn find(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    /// Filter the local listing by title, author or id.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Book> {
        admin_filter(term, &self.books)
    }

    fn locate(&self, id: &BookId) -> Result<(usize, &Book)> {
        self.books
            .iter()
            .enumerate()
            .find(|(_, b)| &b.id == id)
            .ok_or_else(|| StorefrontError::NotFound(id.clone()))
    }

    fn replace(&mut self, index: usize, book: Book) {
        if let Some(slot) = self.books.get_mut(index) {
            *slot = book;
        }
    }

    /// Create a listing. Images that fail to upload are left out.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call, or the store error
    /// if the write fails.
    #[instrument(skip(self, form, files), fields(title = %form.title, files = files.len()))]
    pub async fn create(&mut self, form: &BookFields, files: Vec<ImageFile>) -> Result<Book> {
        let valid = form.validate()?;
        let images = self.images.upload(files).await;

        let now = Timestamp::now();
        let mut record = valid.to_record(valid.effective_order(None), &images, now, now);
        record.retain(|_, value| !value.is_null());
        let record = serde_json::Value::Object(record);

        let key = self.catalog.store().push(BOOKS_PATH, record.clone()).await?;
        let book = normalize_record(&key, &record)
            .ok_or_else(|| StoreError::MissingKey(BOOKS_PATH.to_string()))?;

        self.books.insert(0, book.clone());
        add_breadcrumb("admin", "Created book", Some(&[("book_id", key.as_str())]));
        info!(book_id = %book.id, images = images.len(), "Book created");
        Ok(book)
    }

    /// Edit a listing. Existing images are kept and new uploads appended;
    /// `createdAt` is preserved. Saving a listing as sold moves it to order 0.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call,
    /// [`StorefrontError::NotFound`] when the id is not in the local listing,
    /// or the store error if the write fails.
    #[instrument(skip(self, form, files), fields(book_id = %id, files = files.len()))]
    pub async fn update(
        &mut self,
        id: &BookId,
        form: &BookFields,
        files: Vec<ImageFile>,
    ) -> Result<Book> {
        let valid = form.validate()?;
        let (index, existing) = self.locate(id)?;
        let (created_at, current_order, mut images) =
            (existing.created_at, existing.manual_order, existing.images.clone());

        images.extend(self.images.upload(files).await);

        let record = valid.to_record(
            valid.effective_order(Some(current_order)),
            &images,
            created_at,
            Timestamp::now(),
        );
        let patched = normalize_record(id.as_str(), &serde_json::Value::Object(record.clone()))
            .ok_or_else(|| StorefrontError::NotFound(id.clone()))?;

        self.catalog.store().update(&book_path(id), record).await?;
        self.catalog.invalidate(id).await;

        self.replace(index, patched.clone());
        add_breadcrumb("admin", "Updated book", Some(&[("book_id", id.as_str())]));
        info!(status = %patched.status, order = %patched.manual_order, "Book updated");
        Ok(patched)
    }

    /// Delete a listing. The local entry is only removed once the remote
    /// delete succeeded.
    ///
    /// # Errors
    ///
    /// Returns the store error if the delete fails.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn delete(&mut self, id: &BookId) -> Result<()> {
        self.catalog.store().remove(&book_path(id)).await?;
        self.catalog.invalidate(id).await;
        self.books.retain(|b| &b.id != id);
        add_breadcrumb("admin", "Deleted book", Some(&[("book_id", id.as_str())]));
        info!("Book deleted");
        Ok(())
    }

    /// Flip available/sold. Only `status` and `updatedAt` are written; the
    /// manual order is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] for an unknown id or the store
    /// error if the write fails.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn toggle_status(&mut self, id: &BookId) -> Result<BookStatus> {
        let (index, existing) = self.locate(id)?;
        let status = existing.status.toggled();

        let updated_at = Timestamp::now();

        let mut patch = serde_json::Map::new();
        patch.insert("status".into(), serde_json::Value::from(status.as_str()));
        patch.insert(
            "updatedAt".into(),
            serde_json::Value::from(updated_at.as_millis()),
        );
        self.catalog.store().update(&book_path(id), patch).await?;
        self.catalog.invalidate(id).await;

        if let Some(book) = self.books.get_mut(index) {
            book.status = status;
            book.updated_at = updated_at;
        }
        info!(%status, "Book status toggled");
        Ok(status)
    }
}
