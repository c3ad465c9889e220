//! Book identifiers.
//!
//! Ids are opaque strings assigned by the remote store when a record is pushed.
//! Anything that reaches a fetch goes through [`BookId::parse`] first, so the
//! stringified sentinels a browser route can produce (`"undefined"`, `"null"`,
//! `"NaN"`) never hit the network. Characters the store reserves for paths
//! are rejected too, so an id can never address a field inside a record.

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Values that look like ids but come from a missing value being stringified.
const SENTINEL_IDS: &[&str] = &["undefined", "null", "NaN"];

/// Characters the remote store never puts in a key.
const RESERVED_CHARS: &[char] = &['/', '.', '#', '$', '[', ']'];

/// Opaque, non-empty book identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Parse an identifier, rejecting blank values, stringified sentinels and
    /// anything a store key cannot contain.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedId`] if the id is blank, a sentinel,
    /// or contains a path separator, `. # $ [ ]` or a control character.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || SENTINEL_IDS.contains(&trimmed)
            || trimmed
                .chars()
                .any(|c| RESERVED_CHARS.contains(&c) || c.is_control())
        {
            return Err(ValidationError::MalformedId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::core::fmt::Display for BookId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id = BookId::parse("-NxY12abc").unwrap();
        assert_eq!(id.as_str(), "-NxY12abc");
        assert_eq!(id.to_string(), "-NxY12abc");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(BookId::parse("  abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_parse_rejects_sentinels() {
        for raw in ["", "   ", "undefined", "null", "NaN"] {
            assert!(
                matches!(BookId::parse(raw), Err(ValidationError::MalformedId(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        for raw in ["-Nb1/title", "../books", "a.b", "a#b", "$key", "a[0]", "a]", "a\tb"] {
            assert!(
                matches!(BookId::parse(raw), Err(ValidationError::MalformedId(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(BookId::parse("-Nb1_x-2").is_ok());
    }

    #[test]
    fn test_serde_rejects_blank_id() {
        let result: Result<BookId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let id: BookId = serde_json::from_str("\"b1\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");
    }
}
