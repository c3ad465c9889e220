//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` type. Remote-side failures are
//! captured to Sentry when reported; validation problems are the shopper's
//! or admin's to fix and are only shown.

use thiserror::Error;

use harafish_core::{BookId, ValidationError};

use crate::admin::AdminError;
use crate::cart::CartError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Input rejected before any remote call.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Remote document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Local durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation rejected.
    #[error("Cart: {0}")]
    Cart(#[from] CartError),

    /// Admin operation rejected.
    #[error("Admin: {0}")]
    Admin(#[from] AdminError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A shareable link could not be built.
    #[error("Invalid link: {0}")]
    Link(#[from] url::ParseError),

    /// Listing does not exist (or no longer exists).
    #[error("Book not found: {0}")]
    NotFound(BookId),
}

impl StorefrontError {
    /// Whether the failure happened on the remote side.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Log the error, capturing remote and storage failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Store(_) | Self::Storage(_) | Self::Config(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Operation rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added book", Some(&[("book_id", "-Nabc")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::NotFound(BookId::parse("-Nabc").unwrap());
        assert_eq!(err.to_string(), "Book not found: -Nabc");

        let err = StorefrontError::from(ValidationError::EmptyQuery);
        assert_eq!(err.to_string(), "Invalid input: enter a word to search for");
    }

    #[test]
    fn test_is_remote() {
        let err = StorefrontError::from(StoreError::Unavailable("down".to_string()));
        assert!(err.is_remote());
        assert!(!StorefrontError::from(ValidationError::EmptyQuery).is_remote());
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        StorefrontError::from(StoreError::Unavailable("down".to_string())).report();
        StorefrontError::from(ValidationError::EmptyQuery).report();
    }
}
