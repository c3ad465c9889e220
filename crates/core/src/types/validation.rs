//! Validation errors raised before any remote call is made.

use thiserror::Error;

/// Input that was rejected at the boundary.
///
/// These are user-correctable: the operation is aborted and the message is
/// shown as-is, nothing is sent to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required form field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Price was not a non-negative number.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Cart quantities start at one.
    #[error("invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(i64),

    /// Manual order outside 0..=5 or not an integer.
    #[error("invalid manual order: {0} (must be an integer from 0 to 5)")]
    InvalidManualOrder(String),

    /// Category label outside the fixed set.
    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// Status other than `available` or `sold`.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Submitted search with nothing to search for.
    #[error("enter a word to search for")]
    EmptyQuery,

    /// Identifier was absent or one of the stringified JS sentinels.
    #[error("malformed book id: {0:?}")]
    MalformedId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::MissingField("title").to_string(),
            "missing required field: title"
        );
        assert_eq!(
            ValidationError::InvalidQuantity(0).to_string(),
            "invalid quantity: 0 (must be at least 1)"
        );
        assert_eq!(
            ValidationError::MalformedId("null".to_string()).to_string(),
            "malformed book id: \"null\""
        );
    }
}
