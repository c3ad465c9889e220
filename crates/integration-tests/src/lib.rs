//! Integration tests for the Harafish storefront pipeline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p harafish-integration-tests
//! ```
//!
//! Everything runs against the in-memory document store and in-memory or
//! temporary-directory local storage; no network access is needed.
//!
//! # Test Categories
//!
//! - `browse` - Fetch, order, filter, search and incremental reveal
//! - `cart` - Cart persistence and checkout messages
//! - `admin` - Admin mutations seen from the storefront side

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Map, Value, json};

use harafish_storefront::catalog::Catalog;
use harafish_storefront::config::AdminCredentials;
use harafish_storefront::store::MemoryStore;

/// Admin email accepted by [`admin_credentials`].
pub const ADMIN_EMAIL: &str = "owner@harafish.example";
/// Admin password accepted by [`admin_credentials`].
pub const ADMIN_PASSWORD: &str = "correct horse";

/// A small shelf covering every stored record shape.
#[must_use]
pub fn shelf() -> Map<String, Value> {
    let books = json!({
        "-Nb1": {
            "title": "الحرافيش", "author": "نجيب محفوظ", "category": "ادب",
            "price": 45, "order": 5, "status": "available", "createdAt": 1_000,
            "images": ["https://img.example/harafish.jpg"]
        },
        "-Nb2": {
            "title": "أولاد حارتنا", "author": "نجيب محفوظ", "category": "ادب",
            "price": "60", "status": "sold", "createdAt": 2_000,
            "images": {"0": "https://img.example/awlad-1.jpg", "2": "https://img.example/awlad-2.jpg"}
        },
        "-Nb3": {
            "title": "مقدمة ابن خلدون", "author": "ابن خلدون", "category": "تاريخ وسياسة",
            "price": 120, "order": "3", "createdAt": 3_000,
            "images": "https://img.example/muqaddima.jpg"
        },
        "-Nb4": {
            "title": "The Prophet", "transl": "ثروت عكاشة", "type": "مترجم",
            "category": "شعر ومسرح", "price": 35.5, "order": 1, "createdAt": 4_000
        },
        "undefined": {"title": "broken record"}
    });
    books.as_object().cloned().unwrap_or_default()
}

/// `count` plain records with increasing `createdAt`.
#[must_use]
pub fn numbered_books(count: usize) -> Map<String, Value> {
    (0..count)
        .map(|n| {
            (
                format!("book-{n:03}"),
                json!({"title": format!("كتاب {n}"), "price": 10, "createdAt": n, "category": "ادب"}),
            )
        })
        .collect()
}

/// Store and catalog over `books`.
#[must_use]
pub fn catalog_over(books: Map<String, Value>) -> (Arc<MemoryStore>, Catalog<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_books(books));
    (Arc::clone(&store), Catalog::new(store))
}

/// Credentials matching [`ADMIN_EMAIL`] / [`ADMIN_PASSWORD`].
#[must_use]
pub fn admin_credentials() -> AdminCredentials {
    AdminCredentials {
        email: Some(ADMIN_EMAIL.to_string()),
        password: Some(SecretString::from(ADMIN_PASSWORD)),
    }
}

/// Temporary directory removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("harafish-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
