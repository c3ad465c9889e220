//! Shopping cart ledger.
//!
//! The cart lives in memory and is written to local storage under
//! [`CART_KEY`] after every change. There is no server-side cart; checkout
//! hands the contents to a chat message (see [`crate::checkout`]).

mod persist;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use harafish_core::{Book, BookId, CartEntry, Price, ValidationError};

use crate::error::add_breadcrumb;
use crate::storage::{CART_KEY, LocalStorage};

use persist::{StoredCart, StoredCartRef};

/// Cart operation rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Sold books cannot be added.
    #[error("\"{title}\" is sold and cannot be added to the cart")]
    SoldOut { book_id: BookId, title: String },

    /// Nothing to check out.
    #[error("the cart is empty")]
    Empty,
}

/// Result of [`CartLedger::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered book id → entry ledger backed by local storage.
#[derive(Debug)]
pub struct CartLedger<S> {
    storage: S,
    entries: Vec<CartEntry>,
}

impl<S: LocalStorage> CartLedger<S> {
    /// Rehydrate the cart from storage.
    ///
    /// Missing, unreadable or corrupt data yields an empty cart.
    pub fn load(storage: S) -> Self {
        let entries = match storage.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredCart>(&raw) {
                Ok(StoredCart(entries)) => entries,
                Err(e) => {
                    warn!(error = %e, "Stored cart is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, starting empty");
                Vec::new()
            }
        };
        debug!(entries = entries.len(), "Cart loaded");
        Self { storage, entries }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &BookId) -> bool {
        self.entries.iter().any(|e| &e.book_id == id)
    }

    #[must_use]
    pub fn get(&self, id: &BookId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.book_id == id)
    }

    /// Σ price × quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Σ quantity, for the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Add a book with quantity one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SoldOut`] for sold books.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub fn add(&mut self, book: &Book) -> Result<AddOutcome, CartError> {
        if book.is_sold() {
            return Err(CartError::SoldOut {
                book_id: book.id.clone(),
                title: book.title.clone(),
            });
        }
        if self.contains(&book.id) {
            debug!("Book already in cart");
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.entries.push(CartEntry::snapshot(book));
        self.persist();
        add_breadcrumb("cart", "Added book", Some(&[("book_id", book.id.as_str())]));
        info!(title = %book.title, "Added to cart");
        Ok(AddOutcome::Added)
    }

    /// Remove a book. Returns whether anything was removed.
    #[instrument(skip(self), fields(book_id = %id))]
    pub fn remove(&mut self, id: &BookId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.book_id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
            add_breadcrumb("cart", "Removed book", Some(&[("book_id", id.as_str())]));
        }
        removed
    }

    /// Set the quantity of an entry. Absent ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] when `quantity < 1`; the
    /// entry keeps its previous quantity.
    #[instrument(skip(self), fields(book_id = %id))]
    pub fn update_quantity(&mut self, id: &BookId, quantity: i64) -> Result<(), ValidationError> {
        let qty = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(ValidationError::InvalidQuantity(quantity))?;

        let Some(entry) = self.entries.iter_mut().find(|e| &e.book_id == id) else {
            debug!("Quantity update for a book not in the cart");
            return Ok(());
        };
        entry.quantity = qty;
        self.persist();
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
        add_breadcrumb("cart", "Cleared cart", None);
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&StoredCartRef(&self.entries)) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.set(CART_KEY, &encoded) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use harafish_core::BookStatus;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn book(id: &str, price: &str) -> Book {
        Book {
            price: Price::parse(price).unwrap(),
            ..Book::new(BookId::parse(id).unwrap(), format!("Book {id}"))
        }
    }

    fn id(raw: &str) -> BookId {
        BookId::parse(raw).unwrap()
    }

    #[test]
    fn test_add_and_total() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        assert_eq!(cart.add(&book("a", "30")).unwrap(), AddOutcome::Added);
        assert_eq!(cart.add(&book("b", "12.5")).unwrap(), AddOutcome::Added);
        cart.update_quantity(&id("b"), 2).unwrap();

        assert_eq!(cart.total().display(), "55.00");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_duplicate_add_keeps_one_entry() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        cart.add(&book("a", "30")).unwrap();
        cart.update_quantity(&id("a"), 4).unwrap();
        assert_eq!(
            cart.add(&book("a", "30")).unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 4);
    }

    #[test]
    fn test_sold_book_rejected() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        let sold = Book {
            status: BookStatus::Sold,
            ..book("a", "30")
        };
        assert!(matches!(cart.add(&sold), Err(CartError::SoldOut { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        cart.add(&book("a", "30")).unwrap();
        assert_eq!(
            cart.update_quantity(&id("a"), 0),
            Err(ValidationError::InvalidQuantity(0))
        );
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
    }

    #[test]
    fn test_quantity_update_for_absent_is_noop() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        cart.update_quantity(&id("missing"), 3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_not_resynced() {
        let mut cart = CartLedger::load(MemoryStorage::new());
        let mut listing = book("a", "30");
        cart.add(&listing).unwrap();
        listing.price = Price::parse("99").unwrap();
        cart.add(&listing).unwrap();
        assert_eq!(cart.total().display(), "30.00");
    }

    #[test]
    fn test_persists_and_rehydrates_in_order() {
        let storage = MemoryStorage::new();
        {
            let mut cart = CartLedger::load(&storage);
            cart.add(&book("z", "1")).unwrap();
            cart.add(&book("a", "2")).unwrap();
            cart.add(&book("m", "3")).unwrap();
            cart.remove(&id("a"));
        }
        let cart = CartLedger::load(&storage);
        let ids: Vec<&str> = cart.entries().iter().map(|e| e.book_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m"]);
    }

    #[test]
    fn test_clear_persists() {
        let storage = MemoryStorage::new();
        let mut cart = CartLedger::load(&storage);
        cart.add(&book("a", "1")).unwrap();
        cart.clear();
        assert!(CartLedger::load(&storage).is_empty());
    }

    #[test]
    fn test_corrupt_storage_yields_empty_cart() {
        let storage = MemoryStorage::new();
        storage.set(CART_KEY, "{not json").unwrap();
        assert!(CartLedger::load(&storage).is_empty());
    }

    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey("unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey("unavailable".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_unavailable_storage_keeps_in_memory_changes() {
        let mut cart = CartLedger::load(BrokenStorage);
        assert!(cart.is_empty());
        cart.add(&book("a", "5")).unwrap();
        assert!(cart.contains(&id("a")));
    }
}
