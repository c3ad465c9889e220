//! Command implementations.

pub mod admin;
pub mod browse;
pub mod cart;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use harafish_core::{Book, BookId, ValidationError};
use harafish_storefront::admin::AdminError;
use harafish_storefront::cart::CartError;
use harafish_storefront::catalog::Catalog;
use harafish_storefront::config::StorefrontConfig;
use harafish_storefront::error::StorefrontError;
use harafish_storefront::storage::FileStorage;
use harafish_storefront::store::FirebaseStore;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// An image given on the command line could not be read.
    #[error("Failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CommandError {
    /// Log the error; remote failures also go to Sentry.
    pub fn report(&self) {
        match self {
            Self::Storefront(e) => e.report(),
            Self::Image { .. } => tracing::error!(error = %self, "Command failed"),
        }
    }
}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<CartError> for CommandError {
    fn from(e: CartError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<AdminError> for CommandError {
    fn from(e: AdminError) -> Self {
        Self::Storefront(e.into())
    }
}

/// Shared handles for one CLI invocation.
pub struct Context {
    pub config: StorefrontConfig,
    pub catalog: Catalog<FirebaseStore>,
    pub storage: FileStorage,
}

impl Context {
    pub fn new(config: StorefrontConfig) -> Self {
        let store = Arc::new(FirebaseStore::new(&config.firebase));
        let storage = FileStorage::new(config.data_dir.clone());
        Self {
            catalog: Catalog::new(store),
            storage,
            config,
        }
    }
}

fn parse_id(raw: &str) -> Result<BookId, CommandError> {
    Ok(BookId::parse(raw)?)
}

/// One-line summary used by every listing.
#[allow(clippy::print_stdout)]
fn print_book_line(book: &Book) {
    let sold = if book.is_sold() { " [sold]" } else { "" };
    println!(
        "{:<22} {} - {} | {} EGP | order {}{sold}",
        book.id,
        book.title,
        book.display_author(),
        book.price.display(),
        book.manual_order,
    );
}
